use chrono::{DateTime, Utc};
use eyre::{eyre, Result};
use medisched_core::models::{
    appointment::Appointment,
    doctor::{Doctor, WorkingHours},
    patient::Patient,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub appointment_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDoctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialty: String,
    pub start_hour: i32,
    pub end_hour: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPatient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = eyre::Report;

    fn try_from(row: DbAppointment) -> Result<Self> {
        let status = row
            .status
            .parse()
            .map_err(|e| eyre!("Appointment {} has a bad status: {}", row.id, e))?;
        Ok(Appointment {
            id: row.id,
            doctor_id: row.doctor_id,
            patient_id: row.patient_id,
            appointment_time: row.appointment_time,
            status,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbDoctor> for Doctor {
    type Error = eyre::Report;

    fn try_from(row: DbDoctor) -> Result<Self> {
        let start = u32::try_from(row.start_hour)
            .map_err(|_| eyre!("Doctor {} has a negative start hour", row.id))?;
        let end = u32::try_from(row.end_hour)
            .map_err(|_| eyre!("Doctor {} has a negative end hour", row.id))?;
        let working_hours = WorkingHours::new(start, end)
            .map_err(|e| eyre!("Doctor {} has bad working hours: {}", row.id, e))?;
        Ok(Doctor {
            id: row.id,
            name: row.name,
            email: row.email,
            specialty: row.specialty,
            working_hours,
            created_at: row.created_at,
        })
    }
}

impl From<DbPatient> for Patient {
    fn from(row: DbPatient) -> Self {
        Patient {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

pub(crate) fn into_appointments(rows: Vec<DbAppointment>) -> Result<Vec<Appointment>> {
    rows.into_iter().map(Appointment::try_from).collect()
}
