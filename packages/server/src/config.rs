use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Raw comma-separated `INIT_ADMINS` value (emails treated as admins)
    pub init_admins: String,
    pub directory_read_timeout: Duration,
    pub fiscal_year_utc_offset_hours: i32,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "meibo".to_string()),
            init_admins: env::var("INIT_ADMINS").unwrap_or_default(),
            directory_read_timeout: Duration::from_millis(
                env::var("DIRECTORY_READ_TIMEOUT_MS")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .context("DIRECTORY_READ_TIMEOUT_MS must be a valid number")?,
            ),
            fiscal_year_utc_offset_hours: env::var("FISCAL_YEAR_UTC_OFFSET_HOURS")
                .unwrap_or_else(|_| "9".to_string())
                .parse()
                .context("FISCAL_YEAR_UTC_OFFSET_HOURS must be a valid number")?,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| parse_csv(&v))
                .unwrap_or_default(),
        })
    }
}

/// Split a comma-separated value, trimming entries and dropping empty ones
pub fn parse_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
