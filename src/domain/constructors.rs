//! Builders for pre-shaped error envelopes
//!
//! These are the building blocks services and handlers use to fail with a
//! specific HTTP status. They have no side effects and never touch the
//! override registry; the classifier decides later whether an override
//! replaces the message.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::envelope::ErrorEnvelope;

/// The standard error kinds with a dedicated constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Internal,
    NotImplemented,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::BadRequest,
        ErrorKind::Unauthorized,
        ErrorKind::Forbidden,
        ErrorKind::NotFound,
        ErrorKind::Conflict,
        ErrorKind::Internal,
        ErrorKind::NotImplemented,
    ];

    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
            ErrorKind::NotImplemented => 501,
        }
    }

    /// Message used when the caller does not provide one
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Internal => "Internal Server Error",
            ErrorKind::NotImplemented => "Not Implemented",
        }
    }

    /// Envelope with the default message and empty details
    pub fn envelope(self) -> ErrorEnvelope {
        self.build(self.default_message(), None)
    }

    /// Envelope with a message and optional details.
    ///
    /// Missing details default to an empty object.
    pub fn build(self, message: impl Into<String>, details: Option<Value>) -> ErrorEnvelope {
        let message = message.into();
        let message = if message.is_empty() {
            self.default_message().to_string()
        } else {
            message
        };

        ErrorEnvelope::new(
            self.status_code(),
            message,
            Some(details.unwrap_or_else(|| json!({}))),
        )
    }
}

impl ErrorEnvelope {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ErrorKind::BadRequest.build(message, None)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ErrorKind::Unauthorized.build(message, None)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ErrorKind::Forbidden.build(message, None)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ErrorKind::NotFound.build(message, None)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ErrorKind::Conflict.build(message, None)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ErrorKind::Internal.build(message, None)
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        ErrorKind::NotImplemented.build(message, None)
    }
}

impl From<ErrorKind> for ErrorEnvelope {
    fn from(kind: ErrorKind) -> Self {
        kind.envelope()
    }
}
