//! Error types for the tradeprice system.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the tradeprice system.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HS code that cannot be normalized to 10 digits.
    #[error("Invalid HS code: {0}")]
    InvalidHsCode(String),

    /// Period that is not a valid `YYYYMM` value.
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Start period after end period.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Transport-level or HTTP status failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response document could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an invalid HS code error.
    pub fn invalid_hs_code(msg: impl Into<String>) -> Self {
        Error::InvalidHsCode(msg.into())
    }

    /// Create an invalid period error.
    pub fn invalid_period(msg: impl Into<String>) -> Self {
        Error::InvalidPeriod(msg.into())
    }

    /// Create an invalid range error.
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Error::InvalidRange(msg.into())
    }

    /// Create an HTTP error.
    pub fn http(msg: impl Into<String>) -> Self {
        Error::Http(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }
}
