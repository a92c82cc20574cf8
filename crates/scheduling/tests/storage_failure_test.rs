use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use chrono::{TimeZone, Utc};
use medisched_core::{
    clock::FixedClock,
    errors::ScheduleError,
    models::{
        doctor::{Doctor, NewDoctor, WorkingHours},
        patient::Patient,
        principal::Principal,
    },
};
use medisched_db::mock::repositories::{MockAppointmentRepo, MockDoctorRepo, MockPatientRepo};
use medisched_scheduling::{
    conflict::{ConflictDetector, ConflictWindow},
    directory::DoctorDirectory,
    lifecycle::AppointmentService,
    locks::DoctorLocks,
    slots::SlotCalculator,
};
use mockall::predicate::eq;
use uuid::Uuid;

fn sample_doctor(id: Uuid) -> Doctor {
    Doctor {
        id,
        name: "Gregory House".to_string(),
        email: "house@example.com".to_string(),
        specialty: "Diagnostics".to_string(),
        working_hours: WorkingHours::default(),
        created_at: Utc::now(),
    }
}

fn sample_patient(id: Uuid) -> Patient {
    Patient {
        id,
        name: "Alice Smith".to_string(),
        email: "alice@example.com".to_string(),
        phone: None,
        address: None,
        created_at: Utc::now(),
    }
}

fn service(
    appointments: MockAppointmentRepo,
    doctors: MockDoctorRepo,
    patients: MockPatientRepo,
) -> AppointmentService {
    let appointments = Arc::new(appointments);
    AppointmentService::new(
        appointments.clone(),
        Arc::new(doctors),
        Arc::new(patients),
        Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap())),
        ConflictDetector::new(appointments, ConflictWindow::default()),
        Arc::new(DoctorLocks::new()),
    )
}

#[tokio::test]
async fn test_past_booking_never_reaches_storage() {
    let doctor_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();

    let mut appointments = MockAppointmentRepo::new();
    appointments.expect_create_appointment().times(0);
    appointments.expect_find_by_doctor_and_time_range().times(0);
    let mut doctors = MockDoctorRepo::new();
    doctors
        .expect_get_doctor_by_id()
        .with(eq(doctor_id))
        .returning(|id| Ok(Some(sample_doctor(id))));
    let mut patients = MockPatientRepo::new();
    patients
        .expect_get_patient_by_id()
        .with(eq(patient_id))
        .returning(|id| Ok(Some(sample_patient(id))));

    let result = service(appointments, doctors, patients)
        .book_appointment(
            &Principal::Patient(patient_id),
            doctor_id,
            patient_id,
            Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap(),
        )
        .await;

    assert!(matches!(result, Err(ScheduleError::PastTime(_))));
}

#[tokio::test]
async fn test_insert_failure_surfaces_as_storage_error() {
    let doctor_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();

    let mut appointments = MockAppointmentRepo::new();
    appointments
        .expect_find_by_doctor_and_time_range()
        .times(1)
        .returning(|_, _, _| Ok(Vec::new()));
    appointments
        .expect_create_appointment()
        .times(1)
        .returning(|_| Err(eyre::eyre!("connection refused")));
    let mut doctors = MockDoctorRepo::new();
    doctors
        .expect_get_doctor_by_id()
        .returning(|id| Ok(Some(sample_doctor(id))));
    let mut patients = MockPatientRepo::new();
    patients
        .expect_get_patient_by_id()
        .returning(|id| Ok(Some(sample_patient(id))));

    let result = service(appointments, doctors, patients)
        .book_appointment(
            &Principal::Admin,
            doctor_id,
            patient_id,
            Utc.with_ymd_and_hms(2025, 6, 10, 10, 0, 0).unwrap(),
        )
        .await;

    match result {
        Err(ScheduleError::Storage(report)) => {
            assert!(report.to_string().contains("connection refused"))
        }
        other => panic!("expected storage error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_lookup_failure_in_slots_is_not_retried() {
    let mut doctors = MockDoctorRepo::new();
    doctors
        .expect_get_doctor_by_id()
        .times(1)
        .returning(|_| Err(eyre::eyre!("timeout")));
    let mut appointments = MockAppointmentRepo::new();
    appointments.expect_find_by_doctor_and_time_range().times(0);

    let calculator = SlotCalculator::new(Arc::new(doctors), Arc::new(appointments));
    let result = calculator
        .available_slots(
            Uuid::new_v4(),
            chrono::NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        )
        .await;

    assert!(matches!(result, Err(ScheduleError::Storage(_))));
}

fn directory(doctors: MockDoctorRepo) -> DoctorDirectory {
    DoctorDirectory::new(
        Arc::new(doctors),
        Arc::new(MockPatientRepo::new()),
        Arc::new(MockAppointmentRepo::new()),
        WorkingHours::default(),
        Arc::new(DoctorLocks::new()),
    )
}

fn new_house() -> NewDoctor {
    NewDoctor {
        name: "Gregory House".to_string(),
        email: "house@example.com".to_string(),
        specialty: "Diagnostics".to_string(),
        working_hours: None,
    }
}

#[tokio::test]
async fn test_email_registered_concurrently_is_reported_as_taken() {
    // First lookup sees the email free, the insert then loses to another
    // registration and the second lookup finds the winner.
    let lookups = AtomicUsize::new(0);
    let mut doctors = MockDoctorRepo::new();
    doctors
        .expect_get_doctor_by_email()
        .times(2)
        .returning(move |_| {
            if lookups.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(None)
            } else {
                Ok(Some(sample_doctor(Uuid::new_v4())))
            }
        });
    doctors
        .expect_create_doctor()
        .times(1)
        .returning(|_, _| Err(eyre::eyre!("duplicate key value violates unique constraint")));

    let result = directory(doctors)
        .register_doctor(&Principal::Admin, new_house())
        .await;

    assert!(matches!(result, Err(ScheduleError::EmailTaken(email)) if email == "house@example.com"));
}

#[tokio::test]
async fn test_failed_doctor_insert_without_clash_stays_storage_error() {
    let mut doctors = MockDoctorRepo::new();
    doctors
        .expect_get_doctor_by_email()
        .times(2)
        .returning(|_| Ok(None));
    doctors
        .expect_create_doctor()
        .times(1)
        .returning(|_, _| Err(eyre::eyre!("connection refused")));

    let result = directory(doctors)
        .register_doctor(&Principal::Admin, new_house())
        .await;

    assert!(matches!(result, Err(ScheduleError::Storage(_))));
}
