//! Postgres-backed implementation of the repository traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use medisched_core::models::{
    appointment::{Appointment, AppointmentStatus, NewAppointment},
    doctor::{Doctor, NewDoctor, WorkingHours},
    patient::{NewPatient, Patient},
    query::DoctorSearch,
};
use uuid::Uuid;

use crate::{
    repositories::{appointment, doctor, patient},
    store::{AppointmentRepository, DoctorRepository, PatientRepository},
    DbPool,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl AppointmentRepository for PgStore {
    async fn create_appointment(&self, new: NewAppointment) -> Result<Appointment> {
        appointment::create_appointment(&self.pool, &new).await
    }

    async fn get_appointment_by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        appointment::get_appointment_by_id(&self.pool, id).await
    }

    async fn update_appointment(&self, existing: &Appointment) -> Result<Appointment> {
        appointment::update_appointment(&self.pool, existing).await
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<()> {
        appointment::delete_appointment(&self.pool, id).await
    }

    async fn delete_appointments_by_doctor_id(&self, doctor_id: Uuid) -> Result<u64> {
        appointment::delete_appointments_by_doctor_id(&self.pool, doctor_id).await
    }

    async fn find_by_doctor_and_time_range(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        appointment::find_by_doctor_and_time_range(&self.pool, doctor_id, start, end).await
    }

    async fn find_by_patient_name_and_time_range(
        &self,
        doctor_id: Option<Uuid>,
        patient_name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        appointment::find_by_patient_name_and_time_range(
            &self.pool,
            doctor_id,
            patient_name,
            start,
            end,
        )
        .await
    }

    async fn find_by_patient_id(&self, patient_id: Uuid) -> Result<Vec<Appointment>> {
        appointment::find_by_patient_id(&self.pool, patient_id).await
    }

    async fn find_by_patient_id_and_status(
        &self,
        patient_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>> {
        appointment::find_by_patient_id_and_status(&self.pool, patient_id, status).await
    }

    async fn find_by_doctor_name_and_patient_id(
        &self,
        doctor_name: &str,
        patient_id: Uuid,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>> {
        appointment::find_by_doctor_name_and_patient_id(&self.pool, doctor_name, patient_id, status)
            .await
    }
}

#[async_trait]
impl DoctorRepository for PgStore {
    async fn create_doctor(&self, new: NewDoctor, working_hours: WorkingHours) -> Result<Doctor> {
        doctor::create_doctor(&self.pool, &new, working_hours).await
    }

    async fn get_doctor_by_id(&self, id: Uuid) -> Result<Option<Doctor>> {
        doctor::get_doctor_by_id(&self.pool, id).await
    }

    async fn get_doctor_by_email(&self, email: &str) -> Result<Option<Doctor>> {
        doctor::get_doctor_by_email(&self.pool, email).await
    }

    async fn update_working_hours(&self, id: Uuid, working_hours: WorkingHours) -> Result<Doctor> {
        doctor::update_working_hours(&self.pool, id, working_hours).await
    }

    async fn update_doctor(&self, existing: &Doctor) -> Result<Doctor> {
        doctor::update_doctor(&self.pool, existing).await
    }

    async fn delete_doctor(&self, id: Uuid) -> Result<()> {
        doctor::delete_doctor(&self.pool, id).await
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        doctor::list_doctors(&self.pool).await
    }

    async fn find_doctors(&self, search: &DoctorSearch) -> Result<Vec<Doctor>> {
        doctor::find_doctors(&self.pool, search).await
    }
}

#[async_trait]
impl PatientRepository for PgStore {
    async fn create_patient(&self, new: NewPatient) -> Result<Patient> {
        patient::create_patient(&self.pool, &new).await
    }

    async fn get_patient_by_id(&self, id: Uuid) -> Result<Option<Patient>> {
        patient::get_patient_by_id(&self.pool, id).await
    }
}
