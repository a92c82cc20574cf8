use std::sync::Arc;

use chrono::NaiveDate;
use color_eyre::eyre::{eyre, Result, WrapErr};
use medisched_core::clock::SystemClock;
use medisched_db::{create_pool, PgStore};
use medisched_scheduling::{config::SchedulingConfig, Scheduler};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

/// Prints the open slots of a doctor for a day:
/// `medisched <doctor-id> <yyyy-mm-dd>`
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load configuration, including any .env file
    let config = SchedulingConfig::from_env()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let doctor_id: Uuid = args
        .next()
        .ok_or_else(|| eyre!("usage: medisched <doctor-id> <yyyy-mm-dd>"))?
        .parse()
        .wrap_err("Invalid doctor id")?;
    let date: NaiveDate = args
        .next()
        .ok_or_else(|| eyre!("usage: medisched <doctor-id> <yyyy-mm-dd>"))?
        .parse()
        .wrap_err("Invalid date, expected YYYY-MM-DD")?;

    // Create database connection pool
    let db_pool = create_pool(config.require_database_url()?).await?;
    let scheduler = Scheduler::new(
        Arc::new(PgStore::new(db_pool)),
        Arc::new(SystemClock),
        &config,
    );

    let slots = scheduler.slots.available_slots(doctor_id, date).await?;
    if slots.is_empty() {
        println!("No open slots for doctor {} on {}", doctor_id, date);
    }
    for slot in slots {
        println!("{}", slot);
    }

    Ok(())
}
