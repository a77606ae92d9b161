//! Telemetry channel errors.
//!
//! Callers match on [`ChannelError`] to tell a missing connection apart from
//! a failed dial or write; every variant means the report was not delivered.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    /// No connection is currently established.
    #[error("connection is down")]
    ConnectionDown,

    /// Dialing the telemetry endpoint failed.
    #[error("failed to connect to {endpoint}: {reason}")]
    Dial { endpoint: String, reason: String },

    /// Writing a message to the live connection failed.
    #[error("write failed: {0}")]
    Write(String),

    /// The report could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}
