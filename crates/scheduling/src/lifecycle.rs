//! # Appointment Lifecycle
//!
//! Owns the appointment state machine and every mutation of an appointment.
//!
//! ```text
//! Scheduled --complete--> Completed
//! Scheduled --cancel----> Cancelled
//! ```
//!
//! `Completed` may be overwritten back to `Scheduled` through
//! [`AppointmentService::change_status`], provided the slot is still free.
//! Nothing leaves `Cancelled`. Cancellation is a soft delete: the row is kept
//! for history and stops occupying the doctor's calendar.
//!
//! Booking, rescheduling and status changes hold the doctor's lock from the
//! conflict check until the write has landed, so two concurrent requests for
//! overlapping times cannot both succeed.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use medisched_core::{
    clock::Clock,
    errors::{BookingError, CancelError, ScheduleError, ScheduleResult, StatusError, UpdateError},
    models::{
        appointment::{Appointment, AppointmentStatus, NewAppointment},
        principal::Principal,
        query::AppointmentQuery,
    },
};
use medisched_db::{AppointmentRepository, DoctorRepository, PatientRepository};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{conflict::ConflictDetector, locks::DoctorLocks};

pub struct AppointmentService {
    appointments: Arc<dyn AppointmentRepository>,
    doctors: Arc<dyn DoctorRepository>,
    patients: Arc<dyn PatientRepository>,
    clock: Arc<dyn Clock>,
    detector: ConflictDetector,
    locks: Arc<DoctorLocks>,
}

impl AppointmentService {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        doctors: Arc<dyn DoctorRepository>,
        patients: Arc<dyn PatientRepository>,
        clock: Arc<dyn Clock>,
        detector: ConflictDetector,
        locks: Arc<DoctorLocks>,
    ) -> Self {
        Self {
            appointments,
            doctors,
            patients,
            clock,
            detector,
            locks,
        }
    }

    /// Books `patient_id` with `doctor_id` at `appointment_time`.
    ///
    /// # Errors
    ///
    /// * `Forbidden` - caller is neither the patient, the doctor, nor an admin
    /// * `InvalidDoctor` / `InvalidPatient` - a referenced entity does not exist
    /// * `PastTime` - `appointment_time` is not strictly after now
    /// * `SlotTaken` - the time falls in another appointment's occupied window
    pub async fn book_appointment(
        &self,
        principal: &Principal,
        doctor_id: Uuid,
        patient_id: Uuid,
        appointment_time: DateTime<Utc>,
    ) -> Result<Uuid, BookingError> {
        if !(principal.is_admin()
            || principal.is_patient(patient_id)
            || principal.is_doctor(doctor_id))
        {
            warn!("{:?} may not book for patient {}", principal, patient_id);
            return Err(ScheduleError::Forbidden(format!(
                "Cannot book appointments for patient {}",
                patient_id
            )));
        }

        if self.doctors.get_doctor_by_id(doctor_id).await?.is_none() {
            return Err(ScheduleError::InvalidDoctor(doctor_id));
        }
        if self.patients.get_patient_by_id(patient_id).await?.is_none() {
            return Err(ScheduleError::InvalidPatient(patient_id));
        }
        self.ensure_future(appointment_time)?;

        let _guard = self.locks.lock(doctor_id).await;
        self.ensure_free(doctor_id, appointment_time, None).await?;

        let appointment = self
            .appointments
            .create_appointment(NewAppointment::scheduled(doctor_id, patient_id, appointment_time))
            .await?;

        info!(
            "Booked appointment {} for patient {} with doctor {} at {}",
            appointment.id, patient_id, doctor_id, appointment_time
        );
        Ok(appointment.id)
    }

    /// Moves an appointment to `new_time`. Its own current time never counts
    /// as a conflict.
    pub async fn update_appointment(
        &self,
        principal: &Principal,
        appointment_id: Uuid,
        new_time: DateTime<Utc>,
    ) -> Result<(), UpdateError> {
        let appointment = self.load(appointment_id).await?;
        if !can_manage(principal, &appointment) {
            warn!("{:?} may not reschedule appointment {}", principal, appointment_id);
            return Err(ScheduleError::Forbidden(format!(
                "Cannot reschedule appointment {}",
                appointment_id
            )));
        }
        if self.doctors.get_doctor_by_id(appointment.doctor_id).await?.is_none() {
            return Err(ScheduleError::InvalidDoctor(appointment.doctor_id));
        }
        self.ensure_future(new_time)?;

        let _guard = self.locks.lock(appointment.doctor_id).await;
        // Re-read under the lock; a concurrent cancel may have landed.
        let mut appointment = self.load(appointment_id).await?;
        if appointment.status != AppointmentStatus::Scheduled {
            return Err(ScheduleError::InvalidTransition {
                from: appointment.status,
                to: AppointmentStatus::Scheduled,
            });
        }
        self.ensure_free(appointment.doctor_id, new_time, Some(appointment_id))
            .await?;

        let previous = appointment.appointment_time;
        appointment.appointment_time = new_time;
        self.appointments.update_appointment(&appointment).await?;

        info!(
            "Rescheduled appointment {} from {} to {}",
            appointment_id, previous, new_time
        );
        Ok(())
    }

    /// Cancels a scheduled appointment on behalf of its patient (or an admin).
    pub async fn cancel_appointment(
        &self,
        principal: &Principal,
        appointment_id: Uuid,
    ) -> Result<(), CancelError> {
        let appointment = self.load(appointment_id).await?;
        if !(principal.is_admin() || principal.is_patient(appointment.patient_id)) {
            warn!("{:?} may not cancel appointment {}", principal, appointment_id);
            return Err(ScheduleError::Forbidden(format!(
                "Only the patient who booked appointment {} can cancel it",
                appointment_id
            )));
        }

        let _guard = self.locks.lock(appointment.doctor_id).await;
        let mut appointment = self.load(appointment_id).await?;
        if appointment.status != AppointmentStatus::Scheduled {
            return Err(ScheduleError::InvalidTransition {
                from: appointment.status,
                to: AppointmentStatus::Cancelled,
            });
        }

        appointment.status = AppointmentStatus::Cancelled;
        self.appointments.update_appointment(&appointment).await?;

        info!("Cancelled appointment {}", appointment_id);
        Ok(())
    }

    /// Overwrites the status of an appointment. Only the appointment's doctor
    /// or an admin may do so; a cancelled appointment stays cancelled.
    pub async fn change_status(
        &self,
        principal: &Principal,
        appointment_id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<(), StatusError> {
        let appointment = self.load(appointment_id).await?;
        if !(principal.is_admin() || principal.is_doctor(appointment.doctor_id)) {
            warn!("{:?} may not change status of appointment {}", principal, appointment_id);
            return Err(ScheduleError::Forbidden(format!(
                "Cannot change status of appointment {}",
                appointment_id
            )));
        }

        let _guard = self.locks.lock(appointment.doctor_id).await;
        let mut appointment = self.load(appointment_id).await?;
        let current = appointment.status;
        if current == new_status {
            debug!("Appointment {} already {}", appointment_id, current);
            return Ok(());
        }
        if current == AppointmentStatus::Cancelled {
            return Err(ScheduleError::InvalidTransition {
                from: current,
                to: new_status,
            });
        }
        if new_status == AppointmentStatus::Scheduled {
            // Reactivation occupies the calendar again.
            self.ensure_free(appointment.doctor_id, appointment.appointment_time, Some(appointment_id))
                .await?;
        }

        appointment.status = new_status;
        self.appointments.update_appointment(&appointment).await?;

        info!(
            "Appointment {} moved from {} to {}",
            appointment_id, current, new_status
        );
        Ok(())
    }

    /// Marks a consultation as held, e.g. once a prescription has been issued.
    pub async fn complete_appointment(
        &self,
        principal: &Principal,
        appointment_id: Uuid,
    ) -> Result<(), StatusError> {
        self.change_status(principal, appointment_id, AppointmentStatus::Completed)
            .await
    }

    pub async fn get_appointment(
        &self,
        principal: &Principal,
        appointment_id: Uuid,
    ) -> ScheduleResult<Appointment> {
        let appointment = self.load(appointment_id).await?;
        if !can_manage(principal, &appointment) {
            return Err(ScheduleError::Forbidden(format!(
                "Cannot view appointment {}",
                appointment_id
            )));
        }
        Ok(appointment)
    }

    /// Lists appointments matching one of the filter shapes described on
    /// [`AppointmentQuery`], ordered by time.
    ///
    /// # Errors
    ///
    /// * `InvalidQuery` - a doctor query without a date or patient name, or a
    ///   query with no doctor, patient, or patient name at all
    pub async fn list_appointments(
        &self,
        query: &AppointmentQuery,
    ) -> ScheduleResult<Vec<Appointment>> {
        debug!("Listing appointments: {:?}", query);
        let patient_name = query
            .patient_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let doctor_name = query
            .doctor_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut found = if let Some(doctor_id) = query.doctor_id {
            if query.date.is_none() && patient_name.is_none() {
                return Err(ScheduleError::InvalidQuery(
                    "A doctor's appointments need a date or a patient name".to_string(),
                ));
            }
            let (start, end) = day_range(query.date);
            match patient_name {
                Some(name) => {
                    self.appointments
                        .find_by_patient_name_and_time_range(Some(doctor_id), name, start, end)
                        .await?
                }
                None => {
                    self.appointments
                        .find_by_doctor_and_time_range(doctor_id, start, end)
                        .await?
                }
            }
        } else if let Some(patient_id) = query.patient_id {
            match (doctor_name, query.status) {
                (Some(name), status) => {
                    self.appointments
                        .find_by_doctor_name_and_patient_id(name, patient_id, status)
                        .await?
                }
                (None, Some(status)) => {
                    self.appointments
                        .find_by_patient_id_and_status(patient_id, status)
                        .await?
                }
                (None, None) => self.appointments.find_by_patient_id(patient_id).await?,
            }
        } else if let Some(name) = patient_name {
            let (start, end) = day_range(query.date);
            self.appointments
                .find_by_patient_name_and_time_range(None, name, start, end)
                .await?
        } else {
            return Err(ScheduleError::InvalidQuery(
                "Provide a doctor, a patient, or a patient name".to_string(),
            ));
        };

        found.retain(|a| {
            query.status.is_none_or(|s| a.status == s)
                && query.patient_id.is_none_or(|p| a.patient_id == p)
                && query.date.is_none_or(|d| a.date() == d)
        });
        found.sort_by_key(|a| a.appointment_time);
        Ok(found)
    }

    async fn load(&self, appointment_id: Uuid) -> ScheduleResult<Appointment> {
        self.appointments
            .get_appointment_by_id(appointment_id)
            .await?
            .ok_or_else(|| {
                ScheduleError::NotFound(format!("Appointment with ID {} not found", appointment_id))
            })
    }

    fn ensure_future(&self, time: DateTime<Utc>) -> ScheduleResult<()> {
        let now = self.clock.now();
        if time <= now {
            warn!("Rejected appointment time {} (now {})", time, now);
            return Err(ScheduleError::PastTime(time));
        }
        Ok(())
    }

    async fn ensure_free(
        &self,
        doctor_id: Uuid,
        time: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> ScheduleResult<()> {
        if self.detector.has_conflict(doctor_id, time, exclude).await? {
            warn!("Doctor {} is already booked around {}", doctor_id, time);
            return Err(ScheduleError::SlotTaken { doctor_id, time });
        }
        Ok(())
    }
}

fn can_manage(principal: &Principal, appointment: &Appointment) -> bool {
    principal.is_admin()
        || principal.is_patient(appointment.patient_id)
        || principal.is_doctor(appointment.doctor_id)
}

/// Whole calendar day for `Some(date)`, effectively unbounded otherwise.
fn day_range(date: Option<NaiveDate>) -> (DateTime<Utc>, DateTime<Utc>) {
    let (first, last) = match date {
        Some(date) => (date, date),
        None => (
            NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN),
            NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX),
        ),
    };
    let start = first.and_time(NaiveTime::MIN).and_utc();
    let end = last.and_time(NaiveTime::MIN).and_utc() + Duration::days(1) - Duration::microseconds(1);
    (start, end)
}
