//! Error types for the Beds24 client.

use thiserror::Error;

/// Result type for Beds24 client operations.
pub type Result<T> = std::result::Result<T, Beds24Error>;

/// Beds24 client errors.
#[derive(Debug, Error)]
pub enum Beds24Error {
    /// Configuration error (unusable token, bad base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response, or a 2xx envelope with `success: false`
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}
