use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::appointment::AppointmentStatus;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid doctor: {0}")]
    InvalidDoctor(Uuid),

    #[error("Invalid patient: {0}")]
    InvalidPatient(Uuid),

    #[error("Appointment time {0} is not in the future")]
    PastTime(DateTime<Utc>),

    #[error("Doctor {doctor_id} already has an appointment around {time}")]
    SlotTaken { doctor_id: Uuid, time: DateTime<Utc> },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Cannot move appointment from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Storage error: {0}")]
    Storage(#[from] eyre::Report),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Error returned by `book_appointment`.
pub type BookingError = ScheduleError;
/// Error returned by `update_appointment`.
pub type UpdateError = ScheduleError;
/// Error returned by `cancel_appointment`.
pub type CancelError = ScheduleError;
/// Error returned by `change_status`.
pub type StatusError = ScheduleError;
