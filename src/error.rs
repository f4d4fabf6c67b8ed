//! Error types for index construction and configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoBucketError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(
        "Axis views disagree: {latitude} stations by latitude, {longitude} stations by longitude"
    )]
    InconsistentViews { latitude: usize, longitude: usize },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GeoBucketError>;
