//! Failure values reaching the request boundary
//!
//! A [`Failure`] carries its provenance explicitly. It is constructed by the
//! component that first detects the problem (the database adapter, the
//! validation layer, the HTTP client, or a handler returning a pre-shaped
//! envelope) so the classifier can match on it exhaustively.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::envelope::ErrorEnvelope;

/// A failure with exactly one provenance
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// Raised by the database client
    Database(DatabaseFailure),
    /// Already shaped as an HTTP error by a service or handler
    PreShaped(ErrorEnvelope),
    /// Payload validation failed
    Validation(ValidationFailure),
    /// A downstream HTTP call failed
    Upstream(UpstreamFailure),
    /// Nothing more is known about the failure
    Unknown(UnknownFailure),
}

/// Classification taxonomy, derived from the provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    DatabaseConflict,
    DatabaseUnavailable,
    DatabaseOther,
    FrameworkPassthrough,
    ValidationFailure,
    UpstreamKnownStatus,
    UpstreamUnknown,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::DatabaseConflict => "DatabaseConflict",
            ErrorCategory::DatabaseUnavailable => "DatabaseUnavailable",
            ErrorCategory::DatabaseOther => "DatabaseOther",
            ErrorCategory::FrameworkPassthrough => "FrameworkPassthrough",
            ErrorCategory::ValidationFailure => "ValidationFailure",
            ErrorCategory::UpstreamKnownStatus => "UpstreamKnownStatus",
            ErrorCategory::UpstreamUnknown => "UpstreamUnknown",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Failure {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Failure::Database(db) => match db.code {
                DatabaseErrorCode::ConditionalCheckFailed => ErrorCategory::DatabaseConflict,
                DatabaseErrorCode::Networking => ErrorCategory::DatabaseUnavailable,
                DatabaseErrorCode::Other(_) => ErrorCategory::DatabaseOther,
            },
            Failure::PreShaped(_) => ErrorCategory::FrameworkPassthrough,
            Failure::Validation(_) => ErrorCategory::ValidationFailure,
            Failure::Upstream(upstream) if upstream.response.is_some() => {
                ErrorCategory::UpstreamKnownStatus
            }
            Failure::Upstream(_) | Failure::Unknown(_) => ErrorCategory::UpstreamUnknown,
        }
    }

    /// Short provenance tag used in log fields
    pub fn provenance(&self) -> &'static str {
        match self {
            Failure::Database(_) => "database",
            Failure::PreShaped(_) => "pre_shaped",
            Failure::Validation(_) => "validation",
            Failure::Upstream(_) => "upstream",
            Failure::Unknown(_) => "unknown",
        }
    }

    /// Unclassified failure from any error value
    pub fn unknown<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Failure::Unknown(UnknownFailure::new("Error", err.to_string()))
    }

    /// Convert a loosely typed JSON failure.
    ///
    /// Tagged values (a `provenance` field of `database`, `pre_shaped`,
    /// `validation` or `upstream`) map to their variant. Failures from
    /// JavaScript services are recognised by their usual markers:
    /// `dbConflict` or `type: "dynamo"` (database), `isBoom` with an `output`
    /// (pre-shaped) and `isJoi` (validation). Remaining values with a nested
    /// `response` object are treated as upstream failures; anything else,
    /// `null` included, is unclassified.
    pub fn from_json(value: Value) -> Self {
        if let Ok(tagged) = serde_json::from_value::<TaggedFailure>(value.clone()) {
            return tagged.into();
        }

        if let Some(failure) = marked_failure(&value) {
            return failure;
        }

        if let Some(response) = value.get("response").filter(|r| r.is_object()) {
            if let Ok(response) = serde_json::from_value::<UpstreamResponse>(response.clone()) {
                let message = value
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let mut upstream = UpstreamFailure::from_response(response.status, response.data);
                if let Some(message) = message {
                    upstream.message = message;
                }
                return Failure::Upstream(upstream);
            }
        }

        Failure::Unknown(UnknownFailure::from_value(&value))
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Database(db) => fmt::Display::fmt(db, f),
            Failure::PreShaped(envelope) => fmt::Display::fmt(envelope, f),
            Failure::Validation(validation) => fmt::Display::fmt(validation, f),
            Failure::Upstream(upstream) => fmt::Display::fmt(upstream, f),
            Failure::Unknown(unknown) => fmt::Display::fmt(unknown, f),
        }
    }
}

impl std::error::Error for Failure {}

impl From<ErrorEnvelope> for Failure {
    fn from(envelope: ErrorEnvelope) -> Self {
        Failure::PreShaped(envelope)
    }
}

impl From<DatabaseFailure> for Failure {
    fn from(failure: DatabaseFailure) -> Self {
        Failure::Database(failure)
    }
}

impl From<ValidationFailure> for Failure {
    fn from(failure: ValidationFailure) -> Self {
        Failure::Validation(failure)
    }
}

impl From<UpstreamFailure> for Failure {
    fn from(failure: UpstreamFailure) -> Self {
        Failure::Upstream(failure)
    }
}

impl From<UnknownFailure> for Failure {
    fn from(failure: UnknownFailure) -> Self {
        Failure::Unknown(failure)
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Failure::Unknown(UnknownFailure::new("Error", format!("{err:#}")))
    }
}

/// Driver-level database error code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DatabaseErrorCode {
    /// A conditional write found the item already present
    ConditionalCheckFailed,
    /// The database could not be reached
    Networking,
    Other(String),
}

impl DatabaseErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            DatabaseErrorCode::ConditionalCheckFailed => "ConditionalCheckFailedException",
            DatabaseErrorCode::Networking => "NetworkingError",
            DatabaseErrorCode::Other(code) => code,
        }
    }
}

impl From<&str> for DatabaseErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "ConditionalCheckFailedException" => DatabaseErrorCode::ConditionalCheckFailed,
            "NetworkingError" => DatabaseErrorCode::Networking,
            other => DatabaseErrorCode::Other(other.to_string()),
        }
    }
}

impl From<String> for DatabaseErrorCode {
    fn from(code: String) -> Self {
        DatabaseErrorCode::from(code.as_str())
    }
}

impl From<DatabaseErrorCode> for String {
    fn from(code: DatabaseErrorCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for DatabaseErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseFailure {
    pub code: DatabaseErrorCode,
    #[serde(default)]
    pub message: String,
    /// Data attached by the driver (e.g. the conflicting item)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl DatabaseFailure {
    pub fn new(code: impl Into<DatabaseErrorCode>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl fmt::Display for DatabaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// One field-level validation problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDetail {
    pub message: String,
    /// Dotted path of the offending field
    pub path: String,
    /// Validation rule that failed
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl FieldDetail {
    pub fn new(
        path: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            path: path.into(),
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFailure {
    #[serde(default)]
    pub message: String,
    /// Field errors, in the order the validation layer reported them
    #[serde(default)]
    pub details: Vec<FieldDetail>,
}

impl ValidationFailure {
    /// Build a validation failure.
    ///
    /// An empty message is derived from the field messages joined by `". "`.
    pub fn new(message: impl Into<String>, details: Vec<FieldDetail>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            details
                .iter()
                .map(|d| d.message.as_str())
                .collect::<Vec<_>>()
                .join(". ")
        } else {
            message
        };

        Self { message, details }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str("ValidationError")
        } else {
            write!(f, "ValidationError: {}", self.message)
        }
    }
}

/// Response of a failed downstream HTTP call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamResponse {
    pub status: u16,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamFailure {
    #[serde(default)]
    pub message: String,
    /// Absent when no response was received at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<UpstreamResponse>,
}

impl UpstreamFailure {
    pub fn from_response(status: u16, data: Value) -> Self {
        Self {
            message: format!("Request failed with status code {status}"),
            response: Some(UpstreamResponse { status, data }),
        }
    }

    /// The downstream service never answered
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
        }
    }
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str("UpstreamError")
        } else {
            write!(f, "UpstreamError: {}", self.message)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownFailure {
    pub name: String,
    pub message: String,
}

impl UnknownFailure {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Describe an arbitrary JSON value.
    ///
    /// Objects contribute their `name`/`message` fields when present; every
    /// other value is rendered as compact JSON.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(message) => Self::new("Error", message.clone()),
            Value::Object(map) if map.contains_key("message") => {
                let name = map.get("name").and_then(Value::as_str).unwrap_or("Error");
                let message = match map.get("message") {
                    Some(Value::String(message)) => message.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                Self::new(name, message)
            }
            other => Self::new("Error", other.to_string()),
        }
    }
}

impl fmt::Display for UnknownFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() {
            "Error"
        } else {
            self.name.as_str()
        };
        if self.message.is_empty() {
            f.write_str(name)
        } else {
            write!(f, "{}: {}", name, self.message)
        }
    }
}

/// Tagged JSON form accepted by [`Failure::from_json`]
#[derive(Deserialize)]
#[serde(tag = "provenance", rename_all = "snake_case")]
enum TaggedFailure {
    Database(DatabaseFailure),
    PreShaped(ErrorEnvelope),
    Validation(ValidationFailure),
    Upstream(UpstreamFailure),
}

impl From<TaggedFailure> for Failure {
    fn from(tagged: TaggedFailure) -> Self {
        match tagged {
            TaggedFailure::Database(db) => Failure::Database(db),
            // Re-derive the label and guard the invariants of a wire-supplied envelope
            TaggedFailure::PreShaped(envelope) => Failure::PreShaped(ErrorEnvelope::new(
                envelope.status_code,
                envelope.message,
                envelope.details,
            )),
            TaggedFailure::Validation(validation) => Failure::Validation(ValidationFailure::new(
                validation.message,
                validation.details,
            )),
            TaggedFailure::Upstream(upstream) => Failure::Upstream(upstream),
        }
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn flag(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Failures carrying the markers set by database, Boom or Joi errors
fn marked_failure(value: &Value) -> Option<Failure> {
    if !value.is_object() {
        return None;
    }

    if flag(value, "dbConflict") || str_field(value, "type") == Some("dynamo") {
        let code = match str_field(value, "code") {
            Some(code) => DatabaseErrorCode::from(code),
            None if flag(value, "dbConflict") => DatabaseErrorCode::ConditionalCheckFailed,
            None => DatabaseErrorCode::Other("DatabaseError".to_string()),
        };
        let failure = DatabaseFailure::new(code, str_field(value, "message").unwrap_or_default());
        return Some(Failure::Database(match value.get("data") {
            Some(data) if !data.is_null() => failure.with_data(data.clone()),
            _ => failure,
        }));
    }

    if flag(value, "isBoom") {
        let output = value.get("output")?;
        let status = output
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(500);
        let payload = output.get("payload");
        let message = payload
            .and_then(|p| str_field(p, "message"))
            .or_else(|| str_field(value, "message"))
            .unwrap_or_default();
        let details = value.get("data").filter(|d| !d.is_null()).cloned();
        return Some(Failure::PreShaped(ErrorEnvelope::new(status, message, details)));
    }

    if flag(value, "isJoi") {
        let details = value
            .get("details")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(joi_detail).collect())
            .unwrap_or_default();
        return Some(Failure::Validation(ValidationFailure::new(
            str_field(value, "message").unwrap_or_default(),
            details,
        )));
    }

    None
}

/// A Joi detail; `path` may be a string or a list of segments
fn joi_detail(item: &Value) -> FieldDetail {
    let path = match item.get("path") {
        Some(Value::String(path)) => path.clone(),
        Some(Value::Array(segments)) => segments
            .iter()
            .map(|segment| match segment {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("."),
        _ => String::new(),
    };

    FieldDetail::new(
        path,
        str_field(item, "type").unwrap_or_default(),
        str_field(item, "message").unwrap_or_default(),
    )
}
