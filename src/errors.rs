use thiserror::Error;

use crate::decoder::DecodeError;
use crate::types::AddressParseError;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file/environment loading
    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    /// No registrar constants configured for the requested realm
    #[error("Missing registrar config for realm '{realm}'")]
    MissingRegistrarConfig { realm: String },

    /// Registrar constants present but unusable
    #[error("Invalid registrar config for realm '{realm}': {reason}")]
    InvalidRegistrarConfig { realm: String, reason: String },

    /// Account decoding
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Address parsing
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressParseError),

    /// Snapshot file contents
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Alias file parsing
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Base64 decoding
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl AppError {
    /// True for errors that abort a whole realm computation rather than a single account
    pub fn is_fatal_for_realm(&self) -> bool {
        matches!(
            self,
            AppError::MissingRegistrarConfig { .. } | AppError::InvalidRegistrarConfig { .. }
        )
    }
}
