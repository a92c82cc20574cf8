use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An already-authenticated caller. The scheduling core trusts it and only
/// checks ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "snake_case")]
pub enum Principal {
    Admin,
    Doctor(Uuid),
    Patient(Uuid),
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin)
    }

    pub fn is_patient(&self, patient_id: Uuid) -> bool {
        matches!(self, Principal::Patient(id) if *id == patient_id)
    }

    pub fn is_doctor(&self, doctor_id: Uuid) -> bool {
        matches!(self, Principal::Doctor(id) if *id == doctor_id)
    }
}
