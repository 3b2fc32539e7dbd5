//! # Error Types Module
//!
//! Failures at the service boundary: configuration, dataset reading and
//! storage. Normalization and scoring never fail and do not use these.

/// Custom error types for the loader and storage layers
#[derive(Debug, Clone, PartialEq)]
pub enum PantryError {
    /// Missing or malformed configuration
    Config(String),
    /// Dataset file could not be opened or parsed
    Dataset(String),
    /// Database errors
    Storage(String),
}

impl std::fmt::Display for PantryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PantryError::Config(msg) => write!(f, "Configuration error: {msg}"),
            PantryError::Dataset(msg) => write!(f, "Dataset error: {msg}"),
            PantryError::Storage(msg) => write!(f, "Storage error: {msg}"),
        }
    }
}

impl std::error::Error for PantryError {}

impl From<csv::Error> for PantryError {
    fn from(err: csv::Error) -> Self {
        PantryError::Dataset(err.to_string())
    }
}

impl From<std::io::Error> for PantryError {
    fn from(err: std::io::Error) -> Self {
        PantryError::Dataset(err.to_string())
    }
}

impl From<sqlx::Error> for PantryError {
    fn from(err: sqlx::Error) -> Self {
        PantryError::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for PantryError {
    fn from(err: anyhow::Error) -> Self {
        PantryError::Storage(format!("{err:#}"))
    }
}
