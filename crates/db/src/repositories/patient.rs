use crate::models::DbPatient;
use chrono::Utc;
use eyre::Result;
use medisched_core::models::patient::{NewPatient, Patient};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_patient(pool: &Pool<Postgres>, patient: &NewPatient) -> Result<Patient> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query_as::<_, DbPatient>(
        r#"
        INSERT INTO patients (id, name, email, phone, address, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, email, phone, address, created_at
        "#,
    )
    .bind(id)
    .bind(&patient.name)
    .bind(&patient.email)
    .bind(&patient.phone)
    .bind(&patient.address)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

pub async fn get_patient_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Patient>> {
    let row = sqlx::query_as::<_, DbPatient>(
        r#"
        SELECT id, name, email, phone, address, created_at
        FROM patients
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Patient::from))
}
