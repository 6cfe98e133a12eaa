//! Errors produced while fetching readings.

use thiserror::Error;

/// Why a poll cycle could not produce readings.
///
/// Every variant is transient: the poll loop logs it and tries again on the
/// next cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The endpoint answered with a non-success status.
    #[error("Endpoint returned status {0}")]
    Status(u16),

    /// The request could not be sent or the response not received.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Could not connect to the endpoint.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The body was not a JSON array of readings.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A fixture file could not be read.
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}
