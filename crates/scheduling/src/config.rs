//! # Scheduling Configuration
//!
//! Loads scheduling settings from environment variables, falling back to
//! defaults where a variable is not set. A `.env` file in the working
//! directory is read first; variables already set take precedence.
//!
//! ## Environment Variables
//!
//! - `DEFAULT_WORK_START_HOUR`: first slot hour for doctors registered without hours (default: 9)
//! - `DEFAULT_WORK_END_HOUR`: last slot hour for doctors registered without hours (default: 17)
//! - `CONFLICT_LOOKBACK_MINUTES`: buffer before an appointment that blocks new bookings (default: 10)
//! - `APPOINTMENT_DURATION_MINUTES`: time after an appointment start that blocks new bookings (default: 60)
//! - `DATABASE_URL`: PostgreSQL connection string (optional here; the binaries require it)
//! - `LOG_LEVEL`: logging level (default: "info")

use std::env;

use dotenv::dotenv;
use eyre::{Result, WrapErr};
use medisched_core::models::{
    appointment::APPOINTMENT_DURATION_MINUTES,
    doctor::{WorkingHours, DEFAULT_END_HOUR, DEFAULT_START_HOUR},
};
use tracing::Level;

use crate::conflict::{ConflictWindow, DEFAULT_LOOKBACK_MINUTES};

/// Settings for the scheduling core.
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use medisched_scheduling::config::SchedulingConfig;
///
/// fn example() -> Result<()> {
///     let config = SchedulingConfig::from_env()?;
///     println!(
///         "Default hours {}-{}",
///         config.default_working_hours.start_hour(),
///         config.default_working_hours.end_hour()
///     );
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    /// Working hours given to doctors registered without their own
    pub default_working_hours: WorkingHours,

    /// Occupied window used for booking conflicts
    pub conflict_window: ConflictWindow,

    /// PostgreSQL database connection string
    pub database_url: Option<String>,

    /// Log level for the binaries
    pub log_level: Level,
}

impl SchedulingConfig {
    /// Creates a new SchedulingConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - An hour or minute variable cannot be parsed as a number
    /// - The default working hours are outside 0-23 or not increasing
    /// - A window length is negative
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let start_hour = parse_var("DEFAULT_WORK_START_HOUR", DEFAULT_START_HOUR)?;
        let end_hour = parse_var("DEFAULT_WORK_END_HOUR", DEFAULT_END_HOUR)?;
        let default_working_hours = WorkingHours::new(start_hour, end_hour)
            .wrap_err("Invalid default working hours")?;

        let lookback = parse_var("CONFLICT_LOOKBACK_MINUTES", DEFAULT_LOOKBACK_MINUTES)?;
        let duration = parse_var("APPOINTMENT_DURATION_MINUTES", APPOINTMENT_DURATION_MINUTES)?;
        let conflict_window = ConflictWindow::new(lookback, duration)
            .wrap_err("Invalid conflict window")?;

        let database_url = env::var("DATABASE_URL").ok();

        let log_level = match env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        Ok(Self {
            default_working_hours,
            conflict_window,
            database_url,
            log_level,
        })
    }

    /// Returns the database URL or an error naming the missing variable
    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| eyre::eyre!("DATABASE_URL environment variable must be set"))
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            default_working_hours: WorkingHours::default(),
            conflict_window: ConflictWindow::default(),
            database_url: None,
            log_level: Level::INFO,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid {} value: {}", name, raw)),
        Err(_) => Ok(default),
    }
}
