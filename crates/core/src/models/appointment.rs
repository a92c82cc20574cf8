use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ScheduleError;

/// Length of a consultation. `end_time` is derived from it.
pub const APPOINTMENT_DURATION_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Scheduled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            other => Err(ScheduleError::Validation(format!(
                "Unknown appointment status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub appointment_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.appointment_time + Duration::minutes(APPOINTMENT_DURATION_MINUTES)
    }

    pub fn date(&self) -> NaiveDate {
        self.appointment_time.date_naive()
    }

    pub fn time_of_day(&self) -> NaiveTime {
        self.appointment_time.time()
    }

    /// Hour component used for slot removal.
    pub fn hour(&self) -> u32 {
        self.appointment_time.hour()
    }

    /// Only scheduled appointments block the doctor's calendar.
    pub fn is_active(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }
}

/// An appointment not yet persisted; storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub appointment_time: DateTime<Utc>,
    #[serde(default)]
    pub status: AppointmentStatus,
}

impl NewAppointment {
    pub fn scheduled(doctor_id: Uuid, patient_id: Uuid, appointment_time: DateTime<Utc>) -> Self {
        Self {
            doctor_id,
            patient_id,
            appointment_time,
            status: AppointmentStatus::Scheduled,
        }
    }
}
