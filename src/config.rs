//! # Configuration Module
//!
//! Application settings read from the environment. Call
//! `dotenv::dotenv().ok()` first to pick up a local `.env` file.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::PantryError;

pub const DEFAULT_DATASET_PATH: &str = "dataset/cuisines.csv";

/// Log output format for the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = PantryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(PantryError::Config(format!(
                "LOG_FORMAT must be 'text' or 'json', got '{other}'"
            ))),
        }
    }
}

/// Settings for the dataset loader
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// PostgreSQL connection string (`DATABASE_URL`, required)
    pub database_url: String,
    /// Dataset CSV location (`DATASET_PATH`)
    pub dataset_path: PathBuf,
    /// `LOG_FORMAT`, `text` or `json`
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self, PantryError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PantryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| PantryError::Config("DATABASE_URL must be set".to_string()))?;

        let dataset_path = lookup("DATASET_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH));

        let log_format = match lookup("LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            database_url,
            dataset_path,
            log_format,
        })
    }
}
