//! Doctor and patient registration, profile upkeep and doctor search.

use std::sync::Arc;

use medisched_core::{
    errors::{ScheduleError, ScheduleResult},
    models::{
        doctor::{Doctor, DoctorUpdate, NewDoctor, WorkingHours},
        patient::{NewPatient, Patient},
        principal::Principal,
        query::DoctorSearch,
    },
};
use medisched_db::{AppointmentRepository, DoctorRepository, PatientRepository};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{locks::DoctorLocks, slots::SlotCalculator};

pub struct DoctorDirectory {
    doctors: Arc<dyn DoctorRepository>,
    patients: Arc<dyn PatientRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    default_hours: WorkingHours,
    locks: Arc<DoctorLocks>,
    slots: SlotCalculator,
}

impl DoctorDirectory {
    pub fn new(
        doctors: Arc<dyn DoctorRepository>,
        patients: Arc<dyn PatientRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        default_hours: WorkingHours,
        locks: Arc<DoctorLocks>,
    ) -> Self {
        let slots = SlotCalculator::new(doctors.clone(), appointments.clone());
        Self {
            doctors,
            patients,
            appointments,
            default_hours,
            locks,
            slots,
        }
    }

    /// Registers a doctor. An email already on file is rejected, never
    /// overwritten. Doctors registered without hours get the system default.
    pub async fn register_doctor(
        &self,
        principal: &Principal,
        doctor: NewDoctor,
    ) -> ScheduleResult<Doctor> {
        if !principal.is_admin() {
            return Err(ScheduleError::Forbidden(
                "Only admins can register doctors".to_string(),
            ));
        }
        require_field("name", &doctor.name)?;
        require_field("email", &doctor.email)?;

        if self.doctors.get_doctor_by_email(&doctor.email).await?.is_some() {
            warn!("Doctor email {} is already registered", doctor.email);
            return Err(ScheduleError::EmailTaken(doctor.email));
        }

        let hours = doctor.working_hours.unwrap_or(self.default_hours);
        let email = doctor.email.clone();
        let created = match self.doctors.create_doctor(doctor, hours).await {
            Ok(created) => created,
            Err(err) => return Err(self.explain_email_clash(email, None, err).await),
        };
        info!(
            "Registered doctor {} ({}) working {}-{}",
            created.id,
            created.email,
            hours.start_hour(),
            hours.end_hour()
        );
        Ok(created)
    }

    pub async fn update_working_hours(
        &self,
        principal: &Principal,
        doctor_id: Uuid,
        working_hours: WorkingHours,
    ) -> ScheduleResult<Doctor> {
        if !(principal.is_admin() || principal.is_doctor(doctor_id)) {
            return Err(ScheduleError::Forbidden(format!(
                "Cannot change working hours of doctor {}",
                doctor_id
            )));
        }
        self.get_doctor(doctor_id).await?;

        let _guard = self.locks.lock(doctor_id).await;
        let updated = self
            .doctors
            .update_working_hours(doctor_id, working_hours)
            .await?;
        info!(
            "Doctor {} now works {}-{}",
            doctor_id,
            working_hours.start_hour(),
            working_hours.end_hour()
        );
        Ok(updated)
    }

    /// Applies profile changes to an existing doctor. Admins may edit anyone,
    /// doctors only themselves.
    pub async fn update_doctor(
        &self,
        principal: &Principal,
        doctor_id: Uuid,
        changes: DoctorUpdate,
    ) -> ScheduleResult<Doctor> {
        if !(principal.is_admin() || principal.is_doctor(doctor_id)) {
            return Err(ScheduleError::Forbidden(format!(
                "Cannot update doctor {}",
                doctor_id
            )));
        }
        if let Some(name) = &changes.name {
            require_field("name", name)?;
        }
        if let Some(email) = &changes.email {
            require_field("email", email)?;
        }

        let _guard = self.locks.lock(doctor_id).await;
        let mut doctor = self.get_doctor(doctor_id).await?;
        changes.apply(&mut doctor);

        if let Some(other) = self.doctors.get_doctor_by_email(&doctor.email).await? {
            if other.id != doctor_id {
                warn!("Doctor email {} is already registered", doctor.email);
                return Err(ScheduleError::EmailTaken(doctor.email));
            }
        }

        let updated = match self.doctors.update_doctor(&doctor).await {
            Ok(updated) => updated,
            Err(err) => {
                return Err(self
                    .explain_email_clash(doctor.email, Some(doctor_id), err)
                    .await)
            }
        };
        info!("Updated doctor {} ({})", updated.id, updated.email);
        Ok(updated)
    }

    /// Removes a doctor together with every appointment booked with them.
    pub async fn delete_doctor(&self, principal: &Principal, doctor_id: Uuid) -> ScheduleResult<()> {
        if !principal.is_admin() {
            return Err(ScheduleError::Forbidden(
                "Only admins can delete doctors".to_string(),
            ));
        }
        self.get_doctor(doctor_id).await?;

        {
            let _guard = self.locks.lock(doctor_id).await;
            let removed = self
                .appointments
                .delete_appointments_by_doctor_id(doctor_id)
                .await?;
            self.doctors.delete_doctor(doctor_id).await?;
            info!("Deleted doctor {} and {} appointments", doctor_id, removed);
        }
        self.locks.forget(doctor_id);
        Ok(())
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> ScheduleResult<Doctor> {
        self.doctors
            .get_doctor_by_id(doctor_id)
            .await?
            .ok_or_else(|| ScheduleError::NotFound(format!("Doctor with ID {} not found", doctor_id)))
    }

    pub async fn list_doctors(&self) -> ScheduleResult<Vec<Doctor>> {
        Ok(self.doctors.list_doctors().await?)
    }

    /// Doctors by name and specialty, optionally keeping only those with an
    /// open slot in the requested half of a day. Blank text filters are
    /// ignored. A period without a date is an invalid query.
    pub async fn search_doctors(&self, search: DoctorSearch) -> ScheduleResult<Vec<Doctor>> {
        let search = DoctorSearch {
            name: non_blank(search.name),
            specialty: non_blank(search.specialty),
            ..search
        };
        let availability = match (search.period, search.date) {
            (Some(period), Some(date)) => Some((period, date)),
            (Some(period), None) => {
                return Err(ScheduleError::InvalidQuery(format!(
                    "Filtering by {} needs a date",
                    period
                )))
            }
            (None, _) => None,
        };

        let candidates = self.doctors.find_doctors(&search).await?;
        let Some((period, date)) = availability else {
            return Ok(candidates);
        };

        let mut available = Vec::with_capacity(candidates.len());
        for doctor in candidates {
            let open = self.slots.open_slots(doctor.id, date).await?;
            if open.iter().any(|slot| period.contains_hour(slot.hour)) {
                available.push(doctor);
            }
        }
        debug!(
            "{} doctors have {} slots open on {}",
            available.len(),
            period,
            date
        );
        Ok(available)
    }

    /// Self-registration; there is no principal before the patient exists.
    pub async fn register_patient(&self, patient: NewPatient) -> ScheduleResult<Patient> {
        require_field("name", &patient.name)?;
        require_field("email", &patient.email)?;
        let created = self.patients.create_patient(patient).await?;
        info!("Registered patient {}", created.id);
        Ok(created)
    }

    pub async fn get_patient(&self, patient_id: Uuid) -> ScheduleResult<Patient> {
        self.patients
            .get_patient_by_id(patient_id)
            .await?
            .ok_or_else(|| ScheduleError::NotFound(format!("Patient with ID {} not found", patient_id)))
    }

    /// A failed write may have lost a race on the unique email. Report that
    /// as `EmailTaken` rather than a storage fault.
    async fn explain_email_clash(
        &self,
        email: String,
        doctor_id: Option<Uuid>,
        err: eyre::Report,
    ) -> ScheduleError {
        match self.doctors.get_doctor_by_email(&email).await {
            Ok(Some(holder)) if Some(holder.id) != doctor_id => {
                warn!("Doctor email {} was registered concurrently", email);
                ScheduleError::EmailTaken(email)
            }
            _ => ScheduleError::Storage(err),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn require_field(name: &str, value: &str) -> ScheduleResult<()> {
    if value.trim().is_empty() {
        return Err(ScheduleError::Validation(format!("{} must not be empty", name)));
    }
    Ok(())
}
