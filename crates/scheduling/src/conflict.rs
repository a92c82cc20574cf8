//! Booking conflict detection.
//!
//! A scheduled appointment starting at `t` occupies
//! `[t - lookback, t + duration]`. A proposed start `p` conflicts when its own
//! occupied window would overlap one of the same doctor's, that is when
//! `|t - p| < lookback + duration`. Identical starts always conflict.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use medisched_core::{
    errors::{ScheduleError, ScheduleResult},
    models::appointment::{Appointment, APPOINTMENT_DURATION_MINUTES},
};
use medisched_db::AppointmentRepository;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_LOOKBACK_MINUTES: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictWindow {
    lookback: Duration,
    lookahead: Duration,
}

impl ConflictWindow {
    pub fn new(lookback_minutes: i64, lookahead_minutes: i64) -> ScheduleResult<Self> {
        if lookback_minutes < 0 || lookahead_minutes < 0 {
            return Err(ScheduleError::Validation(format!(
                "Conflict window cannot be negative, got -{}/+{} minutes",
                lookback_minutes, lookahead_minutes
            )));
        }
        Ok(Self {
            lookback: Duration::minutes(lookback_minutes),
            lookahead: Duration::minutes(lookahead_minutes),
        })
    }

    pub fn lookback(&self) -> Duration {
        self.lookback
    }

    pub fn lookahead(&self) -> Duration {
        self.lookahead
    }

    /// Interval blocked by an appointment starting at `start`.
    pub fn occupied(&self, start: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (start - self.lookback, start + self.lookahead)
    }

    /// Length of an occupied window; starts closer than this overlap.
    pub fn span(&self) -> Duration {
        self.lookback + self.lookahead
    }

    /// Range of existing start times worth inspecting for `proposed`.
    pub fn blocking_starts(&self, proposed: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (proposed - self.span(), proposed + self.span())
    }

    pub fn overlaps(&self, existing: DateTime<Utc>, proposed: DateTime<Utc>) -> bool {
        let gap = if existing >= proposed {
            existing - proposed
        } else {
            proposed - existing
        };
        gap == Duration::zero() || gap < self.span()
    }
}

impl Default for ConflictWindow {
    fn default() -> Self {
        Self {
            lookback: Duration::minutes(DEFAULT_LOOKBACK_MINUTES),
            lookahead: Duration::minutes(APPOINTMENT_DURATION_MINUTES),
        }
    }
}

pub struct ConflictDetector {
    appointments: Arc<dyn AppointmentRepository>,
    window: ConflictWindow,
}

impl ConflictDetector {
    pub fn new(appointments: Arc<dyn AppointmentRepository>, window: ConflictWindow) -> Self {
        Self {
            appointments,
            window,
        }
    }

    pub fn window(&self) -> ConflictWindow {
        self.window
    }

    /// Returns the scheduled appointments of `doctor_id` whose occupied window
    /// overlaps the one `proposed` would take, ignoring `exclude` (the
    /// appointment being moved).
    pub async fn conflicts(
        &self,
        doctor_id: Uuid,
        proposed: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> ScheduleResult<Vec<Appointment>> {
        let (from, to) = self.window.blocking_starts(proposed);
        debug!(
            "Checking conflicts for doctor {} at {} (existing starts {} to {})",
            doctor_id, proposed, from, to
        );

        let conflicting: Vec<Appointment> = self
            .appointments
            .find_by_doctor_and_time_range(doctor_id, from, to)
            .await?
            .into_iter()
            .filter(|a| {
                a.is_active()
                    && Some(a.id) != exclude
                    && self.window.overlaps(a.appointment_time, proposed)
            })
            .collect();

        Ok(conflicting)
    }

    pub async fn has_conflict(
        &self,
        doctor_id: Uuid,
        proposed: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> ScheduleResult<bool> {
        Ok(!self.conflicts(doctor_id, proposed, exclude).await?.is_empty())
    }
}
