#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use medisched_core::{
    clock::FixedClock,
    models::{
        appointment::NewAppointment,
        doctor::{NewDoctor, WorkingHours},
        patient::NewPatient,
        principal::Principal,
    },
};
use medisched_db::{AppointmentRepository, InMemoryStore};
use medisched_scheduling::{config::SchedulingConfig, Scheduler};
use uuid::Uuid;

pub struct TestContext {
    pub scheduler: Scheduler,
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<FixedClock>,
    pub doctor_id: Uuid,
    pub p1: Uuid,
    pub p2: Uuid,
}

impl TestContext {
    /// A 9-17 doctor and two patients, with "now" at 2025-06-01 08:00 UTC.
    pub async fn new() -> Self {
        Self::with_hours(None).await
    }

    pub async fn with_hours(hours: Option<WorkingHours>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
        ));
        let scheduler = Scheduler::new(store.clone(), clock.clone(), &SchedulingConfig::default());

        let doctor_id = scheduler
            .directory
            .register_doctor(&Principal::Admin, doctor("Gregory House", "house@example.com", hours))
            .await
            .expect("Failed to register doctor")
            .id;
        let p1 = scheduler
            .directory
            .register_patient(patient("Alice Smith"))
            .await
            .expect("Failed to register patient")
            .id;
        let p2 = scheduler
            .directory
            .register_patient(patient("Bob Jones"))
            .await
            .expect("Failed to register patient")
            .id;

        Self {
            scheduler,
            store,
            clock,
            doctor_id,
            p1,
            p2,
        }
    }

    pub async fn add_doctor(&self, name: &str, email: &str) -> Uuid {
        self.scheduler
            .directory
            .register_doctor(&Principal::Admin, doctor(name, email, None))
            .await
            .expect("Failed to register doctor")
            .id
    }

    pub async fn book(&self, patient_id: Uuid, time: DateTime<Utc>) -> Uuid {
        self.scheduler
            .appointments
            .book_appointment(&Principal::Patient(patient_id), self.doctor_id, patient_id, time)
            .await
            .expect("Failed to book appointment")
    }

    /// Writes a scheduled appointment without conflict checks.
    pub async fn seed(&self, patient_id: Uuid, time: DateTime<Utc>) -> Uuid {
        self.store
            .create_appointment(NewAppointment::scheduled(self.doctor_id, patient_id, time))
            .await
            .expect("Failed to seed appointment")
            .id
    }

    pub async fn slots(&self, date: NaiveDate) -> Vec<String> {
        self.scheduler
            .slots
            .available_slots(self.doctor_id, date)
            .await
            .expect("Failed to compute slots")
    }
}

pub fn doctor(name: &str, email: &str, working_hours: Option<WorkingHours>) -> NewDoctor {
    NewDoctor {
        name: name.to_string(),
        email: email.to_string(),
        specialty: "Diagnostics".to_string(),
        working_hours,
    }
}

pub fn patient(name: &str) -> NewPatient {
    NewPatient {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: Some("555-0100".to_string()),
        address: None,
    }
}

/// 2025-06-10 at the given wall time, UTC.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, hour, minute, 0).unwrap()
}

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
}
