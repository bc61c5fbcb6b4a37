//! Error types for the NocoDB client.
//!
//! # Design
//! Every non-2xx response collapses into `HttpError`, whose display form is
//! `[<status>] <message>`. Callers that need finer handling read `status()`.
//! The remaining variants are local failures that happen before or after
//! the remote call and carry no status.

use serde_json::Value;
use thiserror::Error;

use crate::http::HttpResponse;

/// Message used when a failed response carries nothing usable.
pub const DEFAULT_ERROR_MESSAGE: &str = "Error al comunicarse con NocoDB";

/// Errors returned by `NocoDbClient` and `NocoDb`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("[{status}] {message}")]
    HttpError { status: u16, message: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    TransportError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A success body did not match the requested type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("table endpoint must not be empty")]
    InvalidEndpoint,

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Build an `HttpError` from a failed response.
    ///
    /// A JSON object body yields its `message` (then `error`) string field;
    /// any other JSON value yields `fallback`. A body that is not JSON is
    /// used as the message unless it is blank.
    pub fn from_response(response: &HttpResponse, fallback: &str) -> Self {
        let message = match serde_json::from_str::<Value>(&response.body) {
            Ok(Value::Object(fields)) => ["message", "error"]
                .iter()
                .filter_map(|key| fields.get(*key).and_then(Value::as_str))
                .find(|text| !text.is_empty())
                .unwrap_or(fallback)
                .to_string(),
            Ok(_) => fallback.to_string(),
            Err(_) if response.body.trim().is_empty() => fallback.to_string(),
            Err(_) => response.body.clone(),
        };
        ApiError::HttpError {
            status: response.status,
            message,
        }
    }

    /// HTTP status, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
