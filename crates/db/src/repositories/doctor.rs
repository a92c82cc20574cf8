use crate::models::DbDoctor;
use chrono::Utc;
use eyre::{eyre, Result};
use medisched_core::models::{
    doctor::{Doctor, NewDoctor, WorkingHours},
    query::DoctorSearch,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_doctor(
    pool: &Pool<Postgres>,
    doctor: &NewDoctor,
    working_hours: WorkingHours,
) -> Result<Doctor> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating doctor: id={}, email={}, hours={}-{}",
        id, doctor.email, working_hours.start_hour(), working_hours.end_hour()
    );

    // The unique index on LOWER(email) rejects duplicates instead of overwriting
    let row = sqlx::query_as::<_, DbDoctor>(
        r#"
        INSERT INTO doctors (id, name, email, specialty, start_hour, end_hour, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, name, email, specialty, start_hour, end_hour, created_at
        "#,
    )
    .bind(id)
    .bind(&doctor.name)
    .bind(&doctor.email)
    .bind(&doctor.specialty)
    .bind(working_hours.start_hour() as i32)
    .bind(working_hours.end_hour() as i32)
    .bind(now)
    .fetch_one(pool)
    .await?;

    row.try_into()
}

pub async fn get_doctor_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Doctor>> {
    let row = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, email, specialty, start_hour, end_hour, created_at
        FROM doctors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Doctor::try_from).transpose()
}

pub async fn get_doctor_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<Doctor>> {
    let row = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, email, specialty, start_hour, end_hour, created_at
        FROM doctors
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(Doctor::try_from).transpose()
}

pub async fn update_working_hours(
    pool: &Pool<Postgres>,
    id: Uuid,
    working_hours: WorkingHours,
) -> Result<Doctor> {
    let row = sqlx::query_as::<_, DbDoctor>(
        r#"
        UPDATE doctors
        SET start_hour = $2, end_hour = $3
        WHERE id = $1
        RETURNING id, name, email, specialty, start_hour, end_hour, created_at
        "#,
    )
    .bind(id)
    .bind(working_hours.start_hour() as i32)
    .bind(working_hours.end_hour() as i32)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| eyre!("Doctor {} not found", id))?;

    row.try_into()
}

pub async fn update_doctor(pool: &Pool<Postgres>, doctor: &Doctor) -> Result<Doctor> {
    tracing::debug!("Updating doctor: id={}, email={}", doctor.id, doctor.email);

    let row = sqlx::query_as::<_, DbDoctor>(
        r#"
        UPDATE doctors
        SET name = $2, email = $3, specialty = $4, start_hour = $5, end_hour = $6
        WHERE id = $1
        RETURNING id, name, email, specialty, start_hour, end_hour, created_at
        "#,
    )
    .bind(doctor.id)
    .bind(&doctor.name)
    .bind(&doctor.email)
    .bind(&doctor.specialty)
    .bind(doctor.working_hours.start_hour() as i32)
    .bind(doctor.working_hours.end_hour() as i32)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| eyre!("Doctor {} not found", doctor.id))?;

    row.try_into()
}

pub async fn delete_doctor(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM doctors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_doctors(pool: &Pool<Postgres>) -> Result<Vec<Doctor>> {
    let rows = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, email, specialty, start_hour, end_hour, created_at
        FROM doctors
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Doctor::try_from).collect()
}

pub async fn find_doctors(pool: &Pool<Postgres>, search: &DoctorSearch) -> Result<Vec<Doctor>> {
    let rows = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, email, specialty, start_hour, end_hour, created_at
        FROM doctors
        WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%')
          AND ($2::TEXT IS NULL OR LOWER(specialty) = LOWER($2))
        ORDER BY name ASC
        "#,
    )
    .bind(search.name.as_deref())
    .bind(search.specialty.as_deref())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Doctor::try_from).collect()
}
