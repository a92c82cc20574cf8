use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ScheduleError, ScheduleResult};

pub const DEFAULT_START_HOUR: u32 = 9;
pub const DEFAULT_END_HOUR: u32 = 17;

/// Bounds of a doctor's working day as whole hours. Both ends are slot
/// start hours, so 9..=17 offers slots from 09:00 up to 17:00-18:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    start_hour: u32,
    end_hour: u32,
}

impl WorkingHours {
    pub fn new(start_hour: u32, end_hour: u32) -> ScheduleResult<Self> {
        if start_hour > 23 || end_hour > 23 {
            return Err(ScheduleError::Validation(format!(
                "Working hours must be within 0-23, got {}-{}",
                start_hour, end_hour
            )));
        }
        if start_hour >= end_hour {
            return Err(ScheduleError::Validation(format!(
                "Working hours must start before they end, got {}-{}",
                start_hour, end_hour
            )));
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn hours(&self) -> impl Iterator<Item = u32> {
        self.start_hour..=self.end_hour
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
        }
    }
}

/// Half of the day a slot starts in. Hours before noon are morning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Am,
    Pm,
}

impl DayPeriod {
    pub fn of_hour(hour: u32) -> Self {
        if hour < 12 { DayPeriod::Am } else { DayPeriod::Pm }
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        Self::of_hour(hour) == *self
    }
}

impl fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayPeriod::Am => write!(f, "AM"),
            DayPeriod::Pm => write!(f, "PM"),
        }
    }
}

impl FromStr for DayPeriod {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "am" => Ok(DayPeriod::Am),
            "pm" => Ok(DayPeriod::Pm),
            other => Err(ScheduleError::Validation(format!(
                "Unknown day period: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialty: String,
    pub working_hours: WorkingHours,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub specialty: String,
    /// Falls back to the configured system default when absent.
    pub working_hours: Option<WorkingHours>,
}

/// Profile changes for an existing doctor. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub working_hours: Option<WorkingHours>,
}

impl DoctorUpdate {
    pub fn apply(self, doctor: &mut Doctor) {
        if let Some(name) = self.name {
            doctor.name = name;
        }
        if let Some(email) = self.email {
            doctor.email = email;
        }
        if let Some(specialty) = self.specialty {
            doctor.specialty = specialty;
        }
        if let Some(hours) = self.working_hours {
            doctor.working_hours = hours;
        }
    }
}
