// src/error.rs

use thiserror::Error;

/// The primary error type for the `nila-oidcc` library.
#[derive(Debug, Error)]
pub enum OidccError {
    /// The issuer could not be parsed as an absolute URL that other paths can be joined onto.
    #[error("Invalid issuer URL: {0}")]
    InvalidIssuer(String),

    /// A required field is missing or a value breaks a plan invariant.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The underlying HTTP client failed (connection, TLS, proxy, ...).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The conformance suite answered with a non-2xx status.
    /// The raw body is kept for diagnostics.
    #[error("Remote service returned {status}: {body}")]
    Remote {
        status: reqwest::StatusCode,
        body: String,
    },

    /// A response body did not match the expected shape.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A provided URL could not be parsed or used as a base for the API paths.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
