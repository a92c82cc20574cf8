use color_eyre::eyre::Result;
use medisched_db::{create_pool, schema::initialize_database};
use medisched_scheduling::config::SchedulingConfig;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Creates the scheduling tables and indexes in `DATABASE_URL`.
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

    let database_url = config.require_database_url()?;
    info!("Connecting to database...");
    let db_pool = create_pool(database_url).await?;

    initialize_database(&db_pool).await?;
    info!("Migration finished");

    Ok(())
}
