//! In-process store backing all three repositories.
//!
//! Every operation takes the single `RwLock` once, so a reader sees either
//! the state before a write or after it, never a half-applied one.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::{eyre, Result};
use medisched_core::models::{
    appointment::{Appointment, AppointmentStatus, NewAppointment},
    doctor::{Doctor, NewDoctor, WorkingHours},
    patient::{NewPatient, Patient},
    query::DoctorSearch,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{AppointmentRepository, DoctorRepository, PatientRepository};

#[derive(Debug, Default)]
struct State {
    appointments: HashMap<Uuid, Appointment>,
    doctors: HashMap<Uuid, Doctor>,
    patients: HashMap<Uuid, Patient>,
}

impl State {
    fn patient_name_matches(&self, patient_id: Uuid, needle: &str) -> bool {
        self.patients
            .get(&patient_id)
            .is_some_and(|p| contains_ignore_case(&p.name, needle))
    }

    fn doctor_name_matches(&self, doctor_id: Uuid, needle: &str) -> bool {
        self.doctors
            .get(&doctor_id)
            .is_some_and(|d| contains_ignore_case(&d.name, needle))
    }

    fn collect<F>(&self, filter: F) -> Vec<Appointment>
    where
        F: Fn(&Appointment) -> bool,
    {
        let mut found: Vec<Appointment> = self
            .appointments
            .values()
            .filter(|a| filter(a))
            .cloned()
            .collect();
        found.sort_by_key(|a| (a.appointment_time, a.created_at));
        found
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryStore {
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<Appointment> {
        let mut state = self.state.write().await;
        let created = Appointment {
            id: Uuid::new_v4(),
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            appointment_time: appointment.appointment_time,
            status: appointment.status,
            created_at: Utc::now(),
        };
        state.appointments.insert(created.id, created.clone());
        tracing::debug!("Stored appointment {} in memory", created.id);
        Ok(created)
    }

    async fn get_appointment_by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        Ok(self.state.read().await.appointments.get(&id).cloned())
    }

    async fn update_appointment(&self, appointment: &Appointment) -> Result<Appointment> {
        let mut state = self.state.write().await;
        let stored = state
            .appointments
            .get_mut(&appointment.id)
            .ok_or_else(|| eyre!("Appointment {} not found", appointment.id))?;
        stored.appointment_time = appointment.appointment_time;
        stored.status = appointment.status;
        Ok(stored.clone())
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<()> {
        self.state.write().await.appointments.remove(&id);
        Ok(())
    }

    async fn delete_appointments_by_doctor_id(&self, doctor_id: Uuid) -> Result<u64> {
        let mut state = self.state.write().await;
        let before = state.appointments.len();
        state.appointments.retain(|_, a| a.doctor_id != doctor_id);
        Ok((before - state.appointments.len()) as u64)
    }

    async fn find_by_doctor_and_time_range(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let state = self.state.read().await;
        Ok(state.collect(|a| {
            a.doctor_id == doctor_id && a.appointment_time >= start && a.appointment_time <= end
        }))
    }

    async fn find_by_patient_name_and_time_range(
        &self,
        doctor_id: Option<Uuid>,
        patient_name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let state = self.state.read().await;
        Ok(state.collect(|a| {
            doctor_id.is_none_or(|d| a.doctor_id == d)
                && a.appointment_time >= start
                && a.appointment_time <= end
                && state.patient_name_matches(a.patient_id, patient_name)
        }))
    }

    async fn find_by_patient_id(&self, patient_id: Uuid) -> Result<Vec<Appointment>> {
        let state = self.state.read().await;
        Ok(state.collect(|a| a.patient_id == patient_id))
    }

    async fn find_by_patient_id_and_status(
        &self,
        patient_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>> {
        let state = self.state.read().await;
        Ok(state.collect(|a| a.patient_id == patient_id && a.status == status))
    }

    async fn find_by_doctor_name_and_patient_id(
        &self,
        doctor_name: &str,
        patient_id: Uuid,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>> {
        let state = self.state.read().await;
        Ok(state.collect(|a| {
            a.patient_id == patient_id
                && status.is_none_or(|s| a.status == s)
                && state.doctor_name_matches(a.doctor_id, doctor_name)
        }))
    }
}

#[async_trait]
impl DoctorRepository for InMemoryStore {
    async fn create_doctor(&self, doctor: NewDoctor, working_hours: WorkingHours) -> Result<Doctor> {
        let mut state = self.state.write().await;
        if state
            .doctors
            .values()
            .any(|d| d.email.eq_ignore_ascii_case(&doctor.email))
        {
            return Err(eyre!("Doctor email {} already exists", doctor.email));
        }
        let created = Doctor {
            id: Uuid::new_v4(),
            name: doctor.name,
            email: doctor.email,
            specialty: doctor.specialty,
            working_hours,
            created_at: Utc::now(),
        };
        state.doctors.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_doctor_by_id(&self, id: Uuid) -> Result<Option<Doctor>> {
        Ok(self.state.read().await.doctors.get(&id).cloned())
    }

    async fn get_doctor_by_email(&self, email: &str) -> Result<Option<Doctor>> {
        let state = self.state.read().await;
        Ok(state
            .doctors
            .values()
            .find(|d| d.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_working_hours(&self, id: Uuid, working_hours: WorkingHours) -> Result<Doctor> {
        let mut state = self.state.write().await;
        let doctor = state
            .doctors
            .get_mut(&id)
            .ok_or_else(|| eyre!("Doctor {} not found", id))?;
        doctor.working_hours = working_hours;
        Ok(doctor.clone())
    }

    async fn update_doctor(&self, doctor: &Doctor) -> Result<Doctor> {
        let mut state = self.state.write().await;
        if state
            .doctors
            .values()
            .any(|d| d.id != doctor.id && d.email.eq_ignore_ascii_case(&doctor.email))
        {
            return Err(eyre!("Doctor email {} already exists", doctor.email));
        }
        let stored = state
            .doctors
            .get_mut(&doctor.id)
            .ok_or_else(|| eyre!("Doctor {} not found", doctor.id))?;
        stored.name = doctor.name.clone();
        stored.email = doctor.email.clone();
        stored.specialty = doctor.specialty.clone();
        stored.working_hours = doctor.working_hours;
        Ok(stored.clone())
    }

    async fn delete_doctor(&self, id: Uuid) -> Result<()> {
        self.state.write().await.doctors.remove(&id);
        Ok(())
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        let state = self.state.read().await;
        let mut doctors: Vec<Doctor> = state.doctors.values().cloned().collect();
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(doctors)
    }

    async fn find_doctors(&self, search: &DoctorSearch) -> Result<Vec<Doctor>> {
        let state = self.state.read().await;
        let mut doctors: Vec<Doctor> = state
            .doctors
            .values()
            .filter(|d| {
                search
                    .name
                    .as_deref()
                    .is_none_or(|name| contains_ignore_case(&d.name, name))
                    && search
                        .specialty
                        .as_deref()
                        .is_none_or(|specialty| d.specialty.to_lowercase() == specialty.to_lowercase())
            })
            .cloned()
            .collect();
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(doctors)
    }
}

#[async_trait]
impl PatientRepository for InMemoryStore {
    async fn create_patient(&self, patient: NewPatient) -> Result<Patient> {
        let mut state = self.state.write().await;
        let created = Patient {
            id: Uuid::new_v4(),
            name: patient.name,
            email: patient.email,
            phone: patient.phone,
            address: patient.address,
            created_at: Utc::now(),
        };
        state.patients.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_patient_by_id(&self, id: Uuid) -> Result<Option<Patient>> {
        Ok(self.state.read().await.patients.get(&id).cloned())
    }
}
