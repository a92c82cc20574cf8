use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{appointment::AppointmentStatus, doctor::DayPeriod};

/// Filter combination accepted by appointment listing.
///
/// Supported shapes:
/// - `doctor_id` with `date` and/or `patient_name`
/// - `patient_name` alone (across all doctors), optionally with `date`
/// - `patient_id`, optionally narrowed by `status` and/or `doctor_name`
///
/// `status` narrows any of the above.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentQuery {
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentQuery {
    pub fn for_doctor(doctor_id: Uuid) -> Self {
        Self {
            doctor_id: Some(doctor_id),
            ..Default::default()
        }
    }

    pub fn for_patient(patient_id: Uuid) -> Self {
        Self {
            patient_id: Some(patient_id),
            ..Default::default()
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn patient_named(mut self, name: impl Into<String>) -> Self {
        self.patient_name = Some(name.into());
        self
    }

    pub fn doctor_named(mut self, name: impl Into<String>) -> Self {
        self.doctor_name = Some(name.into());
        self
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Doctor search filters. Name is a case-insensitive substring, specialty a
/// case-insensitive exact match. `period` keeps doctors with at least one
/// open slot in that half of `date`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSearch {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub period: Option<DayPeriod>,
    pub date: Option<NaiveDate>,
}

impl DoctorSearch {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn in_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = Some(specialty.into());
        self
    }

    pub fn available(mut self, date: NaiveDate, period: DayPeriod) -> Self {
        self.date = Some(date);
        self.period = Some(period);
        self
    }
}
