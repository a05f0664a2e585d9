//! Error types for the Taskie API client.
//!
//! # Design
//! Every facade operation returns `ApiResult<T>`, so this enum is the single
//! failure type a caller sees. `Unauthorized` and `NotFound` get dedicated
//! variants because they are the statuses the backend actually produces for
//! bad tokens and unknown task ids; everything else non-2xx lands in
//! `HttpError` with the raw status and body.

use thiserror::Error;

use crate::transport::TransportError;

/// Two-variant outcome of every facade operation.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by `ApiService` parse methods and `RemoteApi` operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (timeout, refused connection).
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The server returned 401.
    #[error("unauthorized")]
    Unauthorized,

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 401 and 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The response was well formed but a required field was absent, null
    /// or empty. Carries the name of the missing field.
    #[error("response is missing `{0}`")]
    EmptyResponse(&'static str),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::DeserializationError(err.to_string())
    }
}
