//! Error types for the Grain admin API client.
//!
//! # Design
//! Only transport-level failures live here: the network call failed, the
//! server answered with a non-2xx status and a body that is not an envelope,
//! or a 2xx body was not a well-formed envelope. A non-2xx reply that does
//! carry an envelope is the server's answer and is returned as data. An envelope carrying `success: false` is a normal `Ok` value and
//! never becomes an `ApiError`; callers inspect `success`/`code`/`message`.
//!
//! The remaining variants reject a request before it is built (bad
//! pagination, structurally invalid payload, no route for the operation).

use thiserror::Error;

use crate::resource::{Operation, Resource};

/// Errors returned by `AdminClient` build/parse methods and by transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout,
    /// unreadable body).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404 without an envelope, which the Grain API only
    /// does for unknown routes.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404 and the body was
    /// not an envelope.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into an envelope.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A list filter is missing `page`/`pageSize` or carries a value below 1.
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    /// A create/update/delete payload failed its structural checks.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The resource has no route for the requested operation.
    #[error("{resource} does not support {operation}")]
    Unsupported {
        resource: Resource,
        operation: Operation,
    },

    /// Client configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<ureq::Error> for ApiError {
    fn from(e: ureq::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}
