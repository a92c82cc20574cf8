//! Per-doctor serialization of check-then-write sequences.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of one async mutex per doctor. Holding the guard makes a
/// conflict check and the following insert/update atomic with respect to
/// other writers for the same doctor. Different doctors never contend.
#[derive(Debug, Default)]
pub struct DoctorLocks {
    locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl DoctorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, doctor_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(doctor_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drops the entry of a doctor that no longer exists.
    pub fn forget(&self, doctor_id: Uuid) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.remove(&doctor_id);
    }
}
