// src/error.rs
use thiserror::Error;

/// Failures raised while exchanging a form submission with the backend.
///
/// Everything here surfaces to the user as a banner message only; by the
/// time a submission reaches the transport there is no field-level detail
/// left to attach an error to.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be sent or the response body could not be read.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not a valid envelope.
    #[error("malformed response envelope: {0}")]
    Decode(#[from] serde_json::Error),

    /// Host-reported failure with no underlying protocol error. Used by
    /// transports that are not backed by an HTTP client (offline hosts,
    /// scripted transports).
    #[error("{0}")]
    General(String),
}

/// Failures while assembling a form configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The endpoint path could not be resolved against the base url.
    #[error("invalid endpoint '{path}' for base '{base}': {source}")]
    InvalidEndpoint {
        base: String,
        path: String,
        #[source]
        source: url::ParseError,
    },
}
