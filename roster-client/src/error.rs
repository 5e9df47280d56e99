use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ERROR_STATUS: u16 = 500;
pub const DEFAULT_ERROR_MESSAGE: &str = "Internal server error";

/// Every failed call, whatever the transport, collapses into this pair.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("HTTP error {status}: {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    /// Fills in `500` / `"Internal server error"` for whatever the response lacks.
    pub fn normalize(status: Option<u16>, message: Option<&str>) -> Self {
        let status = status.filter(|s| *s != 0).unwrap_or(DEFAULT_ERROR_STATUS);
        let message = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
            .to_string();
        Self { status, message }
    }
}
