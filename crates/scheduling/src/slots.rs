//! Free hourly slots of a doctor on a given day.
//!
//! Candidates are the whole hours `start_hour..=end_hour` of the doctor's
//! working hours. A scheduled appointment removes the candidate equal to its
//! start hour and nothing else, even though bookings block a wider window.
//! Only appointments starting within `[date@start_hour, date@end_hour]` are
//! considered, so a booking at 17:30 for a 9-17 doctor leaves 17:00 listed.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use medisched_core::{
    errors::{ScheduleError, ScheduleResult},
    models::doctor::WorkingHours,
};
use medisched_db::{AppointmentRepository, DoctorRepository};
use tracing::debug;
use uuid::Uuid;

/// A one-hour slot rendered as `HH:00-HH:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Slot {
    pub hour: u32,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.hour, self.hour + 1)
    }
}

pub struct SlotCalculator {
    doctors: Arc<dyn DoctorRepository>,
    appointments: Arc<dyn AppointmentRepository>,
}

impl SlotCalculator {
    pub fn new(
        doctors: Arc<dyn DoctorRepository>,
        appointments: Arc<dyn AppointmentRepository>,
    ) -> Self {
        Self {
            doctors,
            appointments,
        }
    }

    /// Open slots in ascending order. Empty when the day is fully booked.
    pub async fn open_slots(&self, doctor_id: Uuid, date: NaiveDate) -> ScheduleResult<Vec<Slot>> {
        let doctor = self
            .doctors
            .get_doctor_by_id(doctor_id)
            .await?
            .ok_or_else(|| ScheduleError::NotFound(format!("Doctor with ID {} not found", doctor_id)))?;

        let hours = doctor.working_hours;
        let (start, end) = day_bounds(date, hours);
        let booked = self
            .appointments
            .find_by_doctor_and_time_range(doctor_id, start, end)
            .await?;

        let mut open: BTreeSet<u32> = hours.hours().collect();
        for appointment in booked.iter().filter(|a| a.is_active()) {
            open.remove(&appointment.hour());
        }

        debug!(
            "Doctor {} on {}: {} of {} slots open",
            doctor_id,
            date,
            open.len(),
            hours.hours().count()
        );

        Ok(open.into_iter().map(|hour| Slot { hour }).collect())
    }

    /// Open slots as `"HH:00-HH:00"` strings.
    pub async fn available_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> ScheduleResult<Vec<String>> {
        Ok(self
            .open_slots(doctor_id, date)
            .await?
            .into_iter()
            .map(|slot| slot.to_string())
            .collect())
    }
}

fn day_bounds(date: NaiveDate, hours: WorkingHours) -> (DateTime<Utc>, DateTime<Utc>) {
    (at_hour(date, hours.start_hour()), at_hour(date, hours.end_hour()))
}

pub(crate) fn at_hour(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    date.and_time(time).and_utc()
}
