use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use medisched_core::clock::{Clock, FixedClock};
use medisched_core::errors::ScheduleError;
use medisched_core::models::{
    appointment::{Appointment, AppointmentStatus, NewAppointment},
    doctor::{DayPeriod, Doctor, DoctorUpdate, WorkingHours},
    principal::Principal,
    query::{AppointmentQuery, DoctorSearch},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, json, to_string, to_value};
use uuid::Uuid;

fn appointment_at(hour: u32, minute: u32) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        doctor_id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        appointment_time: Utc.with_ymd_and_hms(2025, 6, 10, hour, minute, 0).unwrap(),
        status: AppointmentStatus::Scheduled,
        created_at: Utc::now(),
    }
}

#[test]
fn test_appointment_derived_fields() {
    let appointment = appointment_at(10, 30);

    assert_eq!(
        appointment.end_time(),
        Utc.with_ymd_and_hms(2025, 6, 10, 11, 30, 0).unwrap()
    );
    assert_eq!(appointment.date(), NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
    assert_eq!(
        appointment.time_of_day(),
        NaiveTime::from_hms_opt(10, 30, 0).unwrap()
    );
    assert_eq!(appointment.hour(), 10);
}

#[rstest]
#[case(AppointmentStatus::Scheduled, true)]
#[case(AppointmentStatus::Completed, false)]
#[case(AppointmentStatus::Cancelled, false)]
fn test_only_scheduled_is_active(#[case] status: AppointmentStatus, #[case] active: bool) {
    let mut appointment = appointment_at(9, 0);
    appointment.status = status;

    assert_eq!(appointment.is_active(), active);
    assert_eq!(status.is_terminal(), !active);
}

#[rstest]
#[case("scheduled", AppointmentStatus::Scheduled)]
#[case("Completed", AppointmentStatus::Completed)]
#[case(" cancelled ", AppointmentStatus::Cancelled)]
#[case("canceled", AppointmentStatus::Cancelled)]
fn test_status_parsing(#[case] raw: &str, #[case] expected: AppointmentStatus) {
    assert_eq!(raw.parse::<AppointmentStatus>().unwrap(), expected);
}

#[test]
fn test_unknown_status_is_rejected() {
    let err = "pending".parse::<AppointmentStatus>().unwrap_err();
    assert!(matches!(err, ScheduleError::Validation(_)));
}

#[test]
fn test_new_appointment_defaults_to_scheduled() {
    let doctor_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();
    let raw = json!({
        "doctor_id": doctor_id,
        "patient_id": patient_id,
        "appointment_time": "2025-06-10T10:00:00Z",
    });

    let parsed: NewAppointment = serde_json::from_value(raw).expect("Failed to deserialize");
    assert_eq!(parsed.status, AppointmentStatus::Scheduled);
    assert_eq!(
        parsed,
        NewAppointment::scheduled(
            doctor_id,
            patient_id,
            Utc.with_ymd_and_hms(2025, 6, 10, 10, 0, 0).unwrap()
        )
    );
}

#[test]
fn test_appointment_serialization() {
    let appointment = appointment_at(14, 0);

    let json = to_string(&appointment).expect("Failed to serialize appointment");
    let deserialized: Appointment = from_str(&json).expect("Failed to deserialize appointment");

    assert_eq!(deserialized, appointment);
    assert!(json.contains("\"status\":\"scheduled\""));
}

#[rstest]
#[case(9, 17)]
#[case(0, 23)]
#[case(7, 8)]
fn test_valid_working_hours(#[case] start: u32, #[case] end: u32) {
    let hours = WorkingHours::new(start, end).unwrap();

    assert_eq!(hours.start_hour(), start);
    assert_eq!(hours.end_hour(), end);
    assert_eq!(hours.hours().count() as u32, end - start + 1);
}

#[rstest]
#[case(17, 9)]
#[case(9, 9)]
#[case(9, 24)]
#[case(24, 25)]
fn test_invalid_working_hours(#[case] start: u32, #[case] end: u32) {
    let err = WorkingHours::new(start, end).unwrap_err();
    assert!(matches!(err, ScheduleError::Validation(_)));
}

#[test]
fn test_default_working_hours() {
    let hours = WorkingHours::default();

    assert_eq!(hours.start_hour(), 9);
    assert_eq!(hours.end_hour(), 17);
}

#[test]
fn test_principal_checks() {
    let id = Uuid::new_v4();
    let other = Uuid::new_v4();

    assert!(Principal::Admin.is_admin());
    assert!(Principal::Patient(id).is_patient(id));
    assert!(!Principal::Patient(id).is_patient(other));
    assert!(!Principal::Patient(id).is_doctor(id));
    assert!(Principal::Doctor(id).is_doctor(id));
    assert!(!Principal::Admin.is_patient(id));
}

#[test]
fn test_principal_serialization() {
    let id = Uuid::nil();
    let value = to_value(Principal::Doctor(id)).unwrap();

    assert_eq!(value, json!({ "role": "doctor", "id": id }));
}

#[test]
fn test_query_builder() {
    let doctor_id = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

    let query = AppointmentQuery::for_doctor(doctor_id)
        .on(date)
        .patient_named("smith")
        .with_status(AppointmentStatus::Scheduled);

    assert_eq!(query.doctor_id, Some(doctor_id));
    assert_eq!(query.date, Some(date));
    assert_eq!(query.patient_name.as_deref(), Some("smith"));
    assert_eq!(query.status, Some(AppointmentStatus::Scheduled));
    assert_eq!(query.patient_id, None);
}

#[test]
fn test_fixed_clock() {
    let start = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
    let clock = FixedClock::new(start);
    assert_eq!(clock.now(), start);

    clock.advance(Duration::hours(2));
    assert_eq!(clock.now(), start + Duration::hours(2));

    clock.set(start);
    assert_eq!(clock.now(), start);
}

#[test]
fn test_status_tokens() {
    use serde_test::{assert_tokens, Token};

    assert_tokens(
        &AppointmentStatus::Cancelled,
        &[Token::UnitVariant {
            name: "AppointmentStatus",
            variant: "cancelled",
        }],
    );
}

#[rstest]
#[case(0, DayPeriod::Am)]
#[case(11, DayPeriod::Am)]
#[case(12, DayPeriod::Pm)]
#[case(23, DayPeriod::Pm)]
fn test_day_period_of_hour(#[case] hour: u32, #[case] expected: DayPeriod) {
    assert_eq!(DayPeriod::of_hour(hour), expected);
    assert!(expected.contains_hour(hour));
}

#[test]
fn test_day_period_parsing() {
    assert_eq!("AM".parse::<DayPeriod>().unwrap(), DayPeriod::Am);
    assert_eq!(" pm ".parse::<DayPeriod>().unwrap(), DayPeriod::Pm);
    assert!(matches!(
        "noon".parse::<DayPeriod>(),
        Err(ScheduleError::Validation(_))
    ));
    assert_eq!(DayPeriod::Pm.to_string(), "PM");
    assert_eq!(to_value(DayPeriod::Am).unwrap(), json!("am"));
}

#[test]
fn test_doctor_update_keeps_unset_fields() {
    let mut doctor = Doctor {
        id: Uuid::new_v4(),
        name: "Gregory House".to_string(),
        email: "house@example.com".to_string(),
        specialty: "Diagnostics".to_string(),
        working_hours: WorkingHours::default(),
        created_at: Utc::now(),
    };

    DoctorUpdate {
        specialty: Some("Nephrology".to_string()),
        working_hours: Some(WorkingHours::new(8, 12).unwrap()),
        ..Default::default()
    }
    .apply(&mut doctor);

    assert_eq!(doctor.name, "Gregory House");
    assert_eq!(doctor.specialty, "Nephrology");
    assert_eq!(doctor.working_hours.end_hour(), 12);
}

#[test]
fn test_doctor_search_builder() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

    let search = DoctorSearch::named("house")
        .in_specialty("diagnostics")
        .available(date, DayPeriod::Pm);

    assert_eq!(search.name.as_deref(), Some("house"));
    assert_eq!(search.specialty.as_deref(), Some("diagnostics"));
    assert_eq!(search.period, Some(DayPeriod::Pm));
    assert_eq!(search.date, Some(date));
}
