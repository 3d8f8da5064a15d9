use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::selection::upload::DEFAULT_UPLOAD_DELAY;
use crate::selection::validation::{
    ValidationRule, DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_SIZE,
};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on candidate size, in bytes.
    pub max_file_size: u64,
    /// Accepted extensions, normalized by `ValidationRule::new`.
    pub allowed_extensions: Vec<String>,
    pub upload_delay: Duration,
    /// Sessions not touched for this long are evicted.
    pub session_ttl: Duration,
    pub session_sweep_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let allowed_extensions = match lookup("ALLOWED_EXTENSIONS") {
            Some(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
            None => DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let config = Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_file_size: parse_or(&lookup, "MAX_FILE_SIZE", DEFAULT_MAX_SIZE)?,
            allowed_extensions,
            upload_delay: Duration::from_millis(parse_or(
                &lookup,
                "UPLOAD_DELAY_MS",
                DEFAULT_UPLOAD_DELAY.as_millis() as u64,
            )?),
            session_ttl: Duration::from_secs(parse_or(&lookup, "SESSION_TTL_SECS", 1800)?),
            session_sweep_interval: Duration::from_secs(parse_or(
                &lookup,
                "SESSION_SWEEP_SECS",
                60,
            )?),
        };

        anyhow::ensure!(
            !config.validation_rule().allowed_extensions().is_empty(),
            "ALLOWED_EXTENSIONS must name at least one extension"
        );
        anyhow::ensure!(
            !config.session_sweep_interval.is_zero(),
            "SESSION_SWEEP_SECS must be greater than zero"
        );

        Ok(config)
    }

    pub fn validation_rule(&self) -> ValidationRule {
        ValidationRule::new(&self.allowed_extensions, self.max_file_size)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
