use crate::models::{into_appointments, DbAppointment};
use chrono::{DateTime, Utc};
use eyre::{eyre, Result};
use medisched_core::models::appointment::{Appointment, AppointmentStatus, NewAppointment};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const APPOINTMENT_COLUMNS: &str =
    "a.id, a.doctor_id, a.patient_id, a.appointment_time, a.status, a.created_at";

pub async fn create_appointment(
    pool: &Pool<Postgres>,
    appointment: &NewAppointment,
) -> Result<Appointment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating appointment: id={}, doctor_id={}, patient_id={}, time={}",
        id, appointment.doctor_id, appointment.patient_id, appointment.appointment_time
    );

    let row = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (id, doctor_id, patient_id, appointment_time, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, doctor_id, patient_id, appointment_time, status, created_at
        "#,
    )
    .bind(id)
    .bind(appointment.doctor_id)
    .bind(appointment.patient_id)
    .bind(appointment.appointment_time)
    .bind(appointment.status.as_str())
    .bind(now)
    .fetch_one(pool)
    .await?;

    row.try_into()
}

pub async fn get_appointment_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Appointment>> {
    let row = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, doctor_id, patient_id, appointment_time, status, created_at
        FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Appointment::try_from).transpose()
}

pub async fn update_appointment(
    pool: &Pool<Postgres>,
    appointment: &Appointment,
) -> Result<Appointment> {
    let row = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET appointment_time = $2, status = $3
        WHERE id = $1
        RETURNING id, doctor_id, patient_id, appointment_time, status, created_at
        "#,
    )
    .bind(appointment.id)
    .bind(appointment.appointment_time)
    .bind(appointment.status.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| eyre!("Appointment {} not found", appointment.id))?;

    row.try_into()
}

pub async fn delete_appointment(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_appointments_by_doctor_id(pool: &Pool<Postgres>, doctor_id: Uuid) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM appointments
        WHERE doctor_id = $1
        "#,
    )
    .bind(doctor_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn find_by_doctor_and_time_range(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments a
        WHERE a.doctor_id = $1
          AND a.appointment_time BETWEEN $2 AND $3
        ORDER BY a.appointment_time ASC
        "#
    ))
    .bind(doctor_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    into_appointments(rows)
}

pub async fn find_by_patient_name_and_time_range(
    pool: &Pool<Postgres>,
    doctor_id: Option<Uuid>,
    patient_name: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments a
        JOIN patients p ON p.id = a.patient_id
        WHERE ($1::UUID IS NULL OR a.doctor_id = $1)
          AND p.name ILIKE '%' || $2 || '%'
          AND a.appointment_time BETWEEN $3 AND $4
        ORDER BY a.appointment_time ASC
        "#
    ))
    .bind(doctor_id)
    .bind(patient_name)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    into_appointments(rows)
}

pub async fn find_by_patient_id(pool: &Pool<Postgres>, patient_id: Uuid) -> Result<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments a
        WHERE a.patient_id = $1
        ORDER BY a.appointment_time ASC
        "#
    ))
    .bind(patient_id)
    .fetch_all(pool)
    .await?;

    into_appointments(rows)
}

pub async fn find_by_patient_id_and_status(
    pool: &Pool<Postgres>,
    patient_id: Uuid,
    status: AppointmentStatus,
) -> Result<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments a
        WHERE a.patient_id = $1
          AND a.status = $2
        ORDER BY a.appointment_time ASC
        "#
    ))
    .bind(patient_id)
    .bind(status.as_str())
    .fetch_all(pool)
    .await?;

    into_appointments(rows)
}

pub async fn find_by_doctor_name_and_patient_id(
    pool: &Pool<Postgres>,
    doctor_name: &str,
    patient_id: Uuid,
    status: Option<AppointmentStatus>,
) -> Result<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments a
        JOIN doctors d ON d.id = a.doctor_id
        WHERE d.name ILIKE '%' || $1 || '%'
          AND a.patient_id = $2
          AND ($3::VARCHAR IS NULL OR a.status = $3)
        ORDER BY a.appointment_time ASC
        "#
    ))
    .bind(doctor_name)
    .bind(patient_id)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await?;

    into_appointments(rows)
}
