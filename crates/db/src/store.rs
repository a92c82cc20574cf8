//! Storage seams consumed by the scheduling core.
//!
//! Time ranges are inclusive on both ends. Name filters are case-insensitive
//! substring matches. Listing methods return appointments ordered by
//! `appointment_time` ascending.

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

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<Appointment>;

    async fn get_appointment_by_id(&self, id: Uuid) -> Result<Option<Appointment>>;

    /// Persists time and status of an existing appointment.
    async fn update_appointment(&self, appointment: &Appointment) -> Result<Appointment>;

    async fn delete_appointment(&self, id: Uuid) -> Result<()>;

    async fn delete_appointments_by_doctor_id(&self, doctor_id: Uuid) -> Result<u64>;

    /// Every appointment of the doctor, whatever its status, in `[start, end]`.
    async fn find_by_doctor_and_time_range(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>>;

    /// Appointments in `[start, end]` whose patient name contains
    /// `patient_name`, optionally restricted to one doctor.
    async fn find_by_patient_name_and_time_range(
        &self,
        doctor_id: Option<Uuid>,
        patient_name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>>;

    async fn find_by_patient_id(&self, patient_id: Uuid) -> Result<Vec<Appointment>>;

    async fn find_by_patient_id_and_status(
        &self,
        patient_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>>;

    async fn find_by_doctor_name_and_patient_id(
        &self,
        doctor_name: &str,
        patient_id: Uuid,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>>;
}

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Fails if the email is already registered.
    async fn create_doctor(&self, doctor: NewDoctor, working_hours: WorkingHours) -> Result<Doctor>;

    async fn get_doctor_by_id(&self, id: Uuid) -> Result<Option<Doctor>>;

    async fn get_doctor_by_email(&self, email: &str) -> Result<Option<Doctor>>;

    async fn update_working_hours(&self, id: Uuid, working_hours: WorkingHours) -> Result<Doctor>;

    /// Overwrites name, email, specialty and hours. Fails if the doctor is
    /// gone or the email belongs to another doctor.
    async fn update_doctor(&self, doctor: &Doctor) -> Result<Doctor>;

    async fn delete_doctor(&self, id: Uuid) -> Result<()>;

    async fn list_doctors(&self) -> Result<Vec<Doctor>>;

    /// Doctors matching the name and specialty filters of `search`, by name.
    /// Availability filters are left to the caller.
    async fn find_doctors(&self, search: &DoctorSearch) -> Result<Vec<Doctor>>;
}

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn create_patient(&self, patient: NewPatient) -> Result<Patient>;

    async fn get_patient_by_id(&self, id: Uuid) -> Result<Option<Patient>>;
}
