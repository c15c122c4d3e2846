//! Error types for the pets API client.
//!
//! # Design
//! One variant per failure class. `Network` is produced only by the async
//! layer, since the builders and parsers never touch the network; it keeps
//! the transport's error as its `source()`. `Server` is reserved for a
//! rejected upload, where the status code is the only signal inspected.

/// Boxed error returned by a `Transport` when the round-trip itself fails.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by `PetsClient` and `PetsApi`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, DNS or timeout failure. No response body was seen.
    #[error("network error: {0}")]
    Network(#[source] TransportError),

    /// The pet list body did not decode into the expected JSON shape.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The upload-target response was not a JSON object with a string `url`.
    #[error("invalid response from the server: {0}")]
    Protocol(String),

    /// A caller-side precondition failed before any request was made.
    #[error("invalid upload input: {0}")]
    Validation(String),

    /// The upload endpoint answered with a status outside 200..=299.
    #[error("image upload failed with HTTP {status}")]
    Server { status: u16, body: String },
}

impl ApiError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}
