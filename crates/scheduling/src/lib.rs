//! # medisched scheduling
//!
//! The appointment scheduling core: free-slot computation, booking conflict
//! detection and the appointment lifecycle, over abstract repositories.
//!
//! - **Slots**: a doctor's open hourly slots on a day
//! - **Conflict**: occupied-window overlap checks for bookings
//! - **Lifecycle**: book, reschedule, cancel, status changes and listings
//! - **Directory**: doctor and patient registration, profile updates and search
//! - **Config**: environment-driven defaults
//!
//! [`Scheduler`] wires all of them to one store.

pub mod config;
pub mod conflict;
pub mod directory;
pub mod lifecycle;
pub mod locks;
pub mod slots;

use std::sync::Arc;

use medisched_core::clock::{Clock, SystemClock};
use medisched_db::{AppointmentRepository, DoctorRepository, InMemoryStore, PatientRepository};

use crate::{
    config::SchedulingConfig, conflict::ConflictDetector, directory::DoctorDirectory,
    lifecycle::AppointmentService, locks::DoctorLocks, slots::SlotCalculator,
};

/// Every scheduling service, sharing one store, clock and lock registry.
///
/// # Example
///
/// ```no_run
/// use medisched_scheduling::{config::SchedulingConfig, Scheduler};
///
/// let scheduler = Scheduler::in_memory(&SchedulingConfig::default());
/// ```
pub struct Scheduler {
    pub appointments: AppointmentService,
    pub slots: SlotCalculator,
    pub directory: DoctorDirectory,
}

impl Scheduler {
    pub fn new<S>(store: Arc<S>, clock: Arc<dyn Clock>, config: &SchedulingConfig) -> Self
    where
        S: AppointmentRepository + DoctorRepository + PatientRepository + 'static,
    {
        let appointments: Arc<dyn AppointmentRepository> = store.clone();
        let doctors: Arc<dyn DoctorRepository> = store.clone();
        let patients: Arc<dyn PatientRepository> = store;
        let locks = Arc::new(DoctorLocks::new());

        let detector = ConflictDetector::new(appointments.clone(), config.conflict_window);

        Self {
            appointments: AppointmentService::new(
                appointments.clone(),
                doctors.clone(),
                patients.clone(),
                clock,
                detector,
                locks.clone(),
            ),
            slots: SlotCalculator::new(doctors.clone(), appointments.clone()),
            directory: DoctorDirectory::new(
                doctors,
                patients,
                appointments,
                config.default_working_hours,
                locks,
            ),
        }
    }

    pub fn in_memory(config: &SchedulingConfig) -> Self {
        Self::new(Arc::new(InMemoryStore::new()), Arc::new(SystemClock), config)
    }
}
