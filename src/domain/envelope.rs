use std::fmt;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Canonical error response shape
///
/// Every failure that crosses the request boundary is turned into one of
/// these. `status_code` is always a valid HTTP status and `message` is never
/// empty; the constructors and the classifier both enforce that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// HTTP status code
    pub status_code: u16,
    /// Standard short label for the status (e.g. "Conflict")
    #[serde(rename = "error", default)]
    pub error_type: String,
    /// Human readable message
    pub message: String,
    /// Optional structured details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

impl ErrorEnvelope {
    /// Build an envelope for an arbitrary status code.
    ///
    /// Status codes outside 100-599 become 500. An empty message
    /// is replaced by the status label.
    pub fn new(status_code: u16, message: impl Into<String>, details: Option<Value>) -> Self {
        let status_code = if (100..=599).contains(&status_code) {
            status_code
        } else {
            500
        };
        let error_type = status_label(status_code).to_string();
        let message = message.into();
        let message = if message.is_empty() {
            error_type.clone()
        } else {
            message
        };

        Self {
            status_code,
            error_type,
            message,
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Replace the message, ignoring empty replacements
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        if !message.is_empty() {
            self.message = message;
        }
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn without_details(mut self) -> Self {
        self.details = None;
        self
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)
    }
}

impl std::error::Error for ErrorEnvelope {}

/// Standard reason phrase for a status code, "Unknown" when there is none
pub fn status_label(status_code: u16) -> &'static str {
    StatusCode::from_u16(status_code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}
