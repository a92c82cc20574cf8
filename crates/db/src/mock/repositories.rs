use async_trait::async_trait;
use chrono::{DateTime, Utc};
use medisched_core::models::{
    appointment::{Appointment, AppointmentStatus, NewAppointment},
    doctor::{Doctor, NewDoctor, WorkingHours},
    patient::{NewPatient, Patient},
    query::DoctorSearch,
};
use mockall::mock;
use uuid::Uuid;

use crate::store::{AppointmentRepository, DoctorRepository, PatientRepository};

// Mock repositories for testing
mock! {
    pub AppointmentRepo {}

    #[async_trait]
    impl AppointmentRepository for AppointmentRepo {
        async fn create_appointment(&self, appointment: NewAppointment) -> eyre::Result<Appointment>;

        async fn get_appointment_by_id(&self, id: Uuid) -> eyre::Result<Option<Appointment>>;

        async fn update_appointment(&self, appointment: &Appointment) -> eyre::Result<Appointment>;

        async fn delete_appointment(&self, id: Uuid) -> eyre::Result<()>;

        async fn delete_appointments_by_doctor_id(&self, doctor_id: Uuid) -> eyre::Result<u64>;

        async fn find_by_doctor_and_time_range(
            &self,
            doctor_id: Uuid,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> eyre::Result<Vec<Appointment>>;

        async fn find_by_patient_name_and_time_range(
            &self,
            doctor_id: Option<Uuid>,
            patient_name: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> eyre::Result<Vec<Appointment>>;

        async fn find_by_patient_id(&self, patient_id: Uuid) -> eyre::Result<Vec<Appointment>>;

        async fn find_by_patient_id_and_status(
            &self,
            patient_id: Uuid,
            status: AppointmentStatus,
        ) -> eyre::Result<Vec<Appointment>>;

        async fn find_by_doctor_name_and_patient_id(
            &self,
            doctor_name: &str,
            patient_id: Uuid,
            status: Option<AppointmentStatus>,
        ) -> eyre::Result<Vec<Appointment>>;
    }
}

mock! {
    pub DoctorRepo {}

    #[async_trait]
    impl DoctorRepository for DoctorRepo {
        async fn create_doctor(&self, doctor: NewDoctor, working_hours: WorkingHours) -> eyre::Result<Doctor>;

        async fn get_doctor_by_id(&self, id: Uuid) -> eyre::Result<Option<Doctor>>;

        async fn get_doctor_by_email(&self, email: &str) -> eyre::Result<Option<Doctor>>;

        async fn update_working_hours(&self, id: Uuid, working_hours: WorkingHours) -> eyre::Result<Doctor>;

        async fn update_doctor(&self, doctor: &Doctor) -> eyre::Result<Doctor>;

        async fn delete_doctor(&self, id: Uuid) -> eyre::Result<()>;

        async fn list_doctors(&self) -> eyre::Result<Vec<Doctor>>;

        async fn find_doctors(&self, search: &DoctorSearch) -> eyre::Result<Vec<Doctor>>;
    }
}

mock! {
    pub PatientRepo {}

    #[async_trait]
    impl PatientRepository for PatientRepo {
        async fn create_patient(&self, patient: NewPatient) -> eyre::Result<Patient>;

        async fn get_patient_by_id(&self, id: Uuid) -> eyre::Result<Option<Patient>>;
    }
}
