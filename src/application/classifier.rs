//! Failure classification
//!
//! Turns any [`Failure`] into the canonical [`ErrorEnvelope`]. Classification
//! never fails: every provenance maps to a well-formed envelope.
//!
//! Precedence between hard-coded and overridden messages:
//! - database failures always use their hard-coded messages;
//! - pre-shaped and upstream failures use a registered override when present;
//! - the fallback 500 message is whatever the registry holds for 500, which is
//!   the stringified failure unless the caller seeded its own.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::application::ports::ErrorLogger;
use crate::application::registry::OverrideRegistry;
use crate::domain::{
    status_label, DatabaseErrorCode, DatabaseFailure, ErrorEnvelope, Failure, UpstreamFailure,
    ValidationFailure,
};
use crate::infrastructure::logging::TracingErrorLogger;

/// Message used for database failures caused by connectivity
pub const DATABASE_UNREACHABLE_MESSAGE: &str = "Unable to connect to database";

const INTERNAL_SERVER_ERROR: u16 = 500;
const CONFLICT: u16 = 409;
const UNPROCESSABLE_ENTITY: u16 = 422;
const BAD_GATEWAY: u16 = 502;

#[derive(Clone)]
pub struct Classifier {
    logger: Arc<dyn ErrorLogger>,
}

impl Classifier {
    pub fn new(logger: Arc<dyn ErrorLogger>) -> Self {
        Self { logger }
    }

    /// Classify a failure into an envelope.
    ///
    /// Without a registry a fresh empty one is used for this call only. The
    /// failure is logged and its string form registered as the 500 override
    /// (if none exists) before any branching happens.
    pub fn classify(&self, failure: Failure, registry: Option<&OverrideRegistry>) -> ErrorEnvelope {
        let per_call;
        let registry = match registry {
            Some(registry) => registry,
            None => {
                per_call = OverrideRegistry::new();
                &per_call
            }
        };

        self.logger.log_failure(&failure);
        registry.add(INTERNAL_SERVER_ERROR, failure.to_string(), None);

        let category = failure.category();
        let envelope = match failure {
            Failure::Database(db) => classify_database(db),
            Failure::PreShaped(envelope) => classify_pre_shaped(envelope, registry),
            Failure::Validation(validation) => classify_validation(validation),
            Failure::Upstream(upstream) => classify_upstream(upstream, registry),
            Failure::Unknown(_) => internal_fallback(registry),
        };

        debug!(
            category = %category,
            status_code = envelope.status_code,
            "Failure classified"
        );

        envelope
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Arc::new(TracingErrorLogger))
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier").finish_non_exhaustive()
    }
}

/// Classify with the default tracing logger
pub fn classify(failure: Failure, registry: Option<&OverrideRegistry>) -> ErrorEnvelope {
    Classifier::default().classify(failure, registry)
}

fn classify_database(db: DatabaseFailure) -> ErrorEnvelope {
    match db.code {
        DatabaseErrorCode::ConditionalCheckFailed => ErrorEnvelope::new(CONFLICT, db.message, db.data),
        DatabaseErrorCode::Networking => ErrorEnvelope::new(
            BAD_GATEWAY,
            DATABASE_UNREACHABLE_MESSAGE,
            Some(Value::String(db.message)),
        ),
        DatabaseErrorCode::Other(_) => ErrorEnvelope::new(BAD_GATEWAY, db.message, None),
    }
}

fn classify_pre_shaped(envelope: ErrorEnvelope, registry: &OverrideRegistry) -> ErrorEnvelope {
    match registry.get(envelope.status_code) {
        Some(entry) => {
            let mut envelope = envelope.with_message(entry.message);
            if entry.details.is_some() {
                envelope.details = entry.details;
            }
            envelope
        }
        None => envelope,
    }
}

fn classify_validation(validation: ValidationFailure) -> ErrorEnvelope {
    let message = validation.to_string();
    let details = serde_json::to_value(&validation.details).ok();
    ErrorEnvelope::new(UNPROCESSABLE_ENTITY, message, details)
}

fn classify_upstream(upstream: UpstreamFailure, registry: &OverrideRegistry) -> ErrorEnvelope {
    let Some(response) = upstream.response else {
        return internal_fallback(registry);
    };

    // Only error statuses pass through; anything else means the downstream
    // answer itself was unusable.
    let status_code = if (400..=599).contains(&response.status) {
        response.status
    } else {
        BAD_GATEWAY
    };

    let message = registry
        .get(status_code)
        .map(|entry| entry.message)
        .filter(|message| !message.is_empty())
        .or_else(|| data_string(&response.data, "message"))
        .or_else(|| data_string(&response.data, "description"))
        .unwrap_or_else(|| status_label(status_code).to_string());

    let details = match response.data {
        Value::Null => None,
        data => Some(data),
    };

    ErrorEnvelope::new(status_code, message, details)
}

fn internal_fallback(registry: &OverrideRegistry) -> ErrorEnvelope {
    match registry.get(INTERNAL_SERVER_ERROR) {
        Some(entry) => {
            let details = entry.to_details();
            let message = if entry.message.is_empty() {
                INTERNAL_SERVER_ERROR.to_string()
            } else {
                entry.message
            };
            ErrorEnvelope::new(INTERNAL_SERVER_ERROR, message, Some(details))
        }
        None => ErrorEnvelope::new(
            INTERNAL_SERVER_ERROR,
            INTERNAL_SERVER_ERROR.to_string(),
            None,
        ),
    }
}

fn data_string(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockErrorLogger;
    use crate::application::registry::OverrideSeed;
    use crate::domain::{FieldDetail, UnknownFailure};
    use serde_json::json;

    fn quiet_classifier() -> Classifier {
        let mut logger = MockErrorLogger::new();
        logger.expect_log_failure().return_const(());
        logger.expect_log_error().never();
        Classifier::new(Arc::new(logger))
    }

    fn seeded(seed: &[(u16, &str)]) -> OverrideRegistry {
        OverrideRegistry::create(
            seed.iter()
                .map(|(status, message)| OverrideSeed::new(*status, *message)),
        )
    }

    #[test]
    fn test_logs_failure_exactly_once() {
        let mut logger = MockErrorLogger::new();
        logger
            .expect_log_failure()
            .withf(|failure| failure.to_string() == "Error: Something bad")
            .times(1)
            .return_const(());
        let classifier = Classifier::new(Arc::new(logger));

        classifier.classify(UnknownFailure::new("Error", "Something bad").into(), None);
    }

    #[test]
    fn test_logs_before_registering_fallback() {
        let registry = Arc::new(OverrideRegistry::new());
        let observed = Arc::clone(&registry);

        let mut logger = MockErrorLogger::new();
        logger
            .expect_log_failure()
            .times(1)
            .returning(move |_| assert!(!observed.contains(500)));
        let classifier = Classifier::new(Arc::new(logger));

        classifier.classify(ErrorEnvelope::not_found("gone").into(), Some(&registry));
        assert!(registry.contains(500));
    }

    #[test]
    fn test_database_conflict_ignores_override() {
        let registry = seeded(&[(409, "Custom conflict")]);
        let failure = DatabaseFailure::new("ConditionalCheckFailedException", "Item exists")
            .with_data(json!({"id": 1}));

        let envelope = quiet_classifier().classify(failure.into(), Some(&registry));

        assert_eq!(envelope.status_code, 409);
        assert_eq!(envelope.message, "Item exists");
        assert_eq!(envelope.details, Some(json!({"id": 1})));
    }

    #[test]
    fn test_database_networking_relocates_message() {
        let failure = DatabaseFailure::new("NetworkingError", "DB unreachable");

        let envelope = quiet_classifier().classify(failure.into(), None);

        assert_eq!(envelope.status_code, 502);
        assert_eq!(envelope.message, DATABASE_UNREACHABLE_MESSAGE);
        assert_eq!(envelope.details, Some(json!("DB unreachable")));
    }

    #[test]
    fn test_database_other_code() {
        let registry = seeded(&[(502, "Custom gateway")]);
        let failure = DatabaseFailure::new("ProvisionedThroughputExceededException", "Slow down");

        let envelope = quiet_classifier().classify(failure.into(), Some(&registry));

        assert_eq!(envelope.status_code, 502);
        assert_eq!(envelope.message, "Slow down");
        assert!(envelope.details.is_none());
    }

    #[test]
    fn test_pre_shaped_with_override() {
        let registry = seeded(&[(400, "Custom bad request")]);

        let envelope = quiet_classifier().classify(
            ErrorEnvelope::bad_request("Validation failed").into(),
            Some(&registry),
        );

        assert_eq!(envelope.status_code, 400);
        assert_eq!(envelope.error_type, "Bad Request");
        assert_eq!(envelope.message, "Custom bad request");
        assert_eq!(envelope.details, Some(json!({})));
    }

    #[test]
    fn test_pre_shaped_override_details_win() {
        let registry = OverrideRegistry::new();
        registry.add(403, "No access", Some(json!({"hint": "ask an admin"})));
        let original = ErrorEnvelope::forbidden("Forbidden").with_details(json!({"role": "guest"}));

        let envelope = quiet_classifier().classify(original.into(), Some(&registry));

        assert_eq!(envelope.message, "No access");
        assert_eq!(envelope.details, Some(json!({"hint": "ask an admin"})));
    }

    #[test]
    fn test_pre_shaped_override_without_details_keeps_own_details() {
        let registry = seeded(&[(409, "Already exists")]);
        let original = ErrorEnvelope::conflict("Email taken").with_details(json!({"field": "email"}));

        let envelope = quiet_classifier().classify(original.into(), Some(&registry));

        assert_eq!(envelope.status_code, 409);
        assert_eq!(envelope.error_type, "Conflict");
        assert_eq!(envelope.message, "Already exists");
        assert_eq!(envelope.details, Some(json!({"field": "email"})));
    }

    #[test]
    fn test_pre_shaped_without_override_passes_through() {
        let original = ErrorEnvelope::not_found("User 7 not found").with_details(json!({"id": 7}));

        let envelope = quiet_classifier().classify(original.clone().into(), None);

        assert_eq!(envelope, original);
    }

    #[test]
    fn test_pre_shaped_500_picks_up_step_zero_registration() {
        let envelope =
            quiet_classifier().classify(ErrorEnvelope::internal("Disk full").into(), None);

        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.message, "Internal Server Error: Disk full");
    }

    #[test]
    fn test_validation_preserves_details() {
        let details = vec![
            FieldDetail::new("name", "required", "\"name\" is required"),
            FieldDetail::new("email", "email", "\"email\" must be a valid email"),
            FieldDetail::new("age", "range", "\"age\" must be positive"),
        ];
        let failure = ValidationFailure::new("", details);

        let envelope = quiet_classifier().classify(failure.into(), None);

        assert_eq!(envelope.status_code, 422);
        assert!(envelope.message.starts_with("ValidationError: "));
        let details = envelope.details.unwrap();
        let details = details.as_array().unwrap();
        assert_eq!(details.len(), 3);
        assert_eq!(details[0]["path"], "name");
        assert_eq!(details[1]["path"], "email");
        assert_eq!(details[2]["path"], "age");
    }

    #[test]
    fn test_upstream_override_wins() {
        let registry = seeded(&[(404, "Custom 404")]);
        let failure = UpstreamFailure::from_response(
            404,
            json!({"message": "Not Found", "description": "Resource missing"}),
        );

        let envelope = quiet_classifier().classify(failure.into(), Some(&registry));

        assert_eq!(envelope.status_code, 404);
        assert_eq!(envelope.message, "Custom 404");
        assert_eq!(
            envelope.details,
            Some(json!({"message": "Not Found", "description": "Resource missing"}))
        );
    }

    #[test]
    fn test_upstream_message_then_description() {
        let with_message = UpstreamFailure::from_response(409, json!({"message": "Taken"}));
        let with_description =
            UpstreamFailure::from_response(429, json!({"description": "Slow down"}));

        let classifier = quiet_classifier();
        assert_eq!(
            classifier.classify(with_message.into(), None).message,
            "Taken"
        );
        let envelope = classifier.classify(with_description.into(), None);
        assert_eq!(envelope.status_code, 429);
        assert_eq!(envelope.message, "Slow down");
    }

    #[test]
    fn test_upstream_without_text_uses_label() {
        let failure = UpstreamFailure::from_response(503, Value::Null);

        let envelope = quiet_classifier().classify(failure.into(), None);

        assert_eq!(envelope.status_code, 503);
        assert_eq!(envelope.message, "Service Unavailable");
        assert!(envelope.details.is_none());
    }

    #[test]
    fn test_upstream_non_error_status_becomes_bad_gateway() {
        let failure = UpstreamFailure::from_response(200, json!({"message": "ok?"}));

        let envelope = quiet_classifier().classify(failure.into(), None);

        assert_eq!(envelope.status_code, 502);
        assert_eq!(envelope.message, "ok?");
    }

    #[test]
    fn test_upstream_override_follows_emitted_status() {
        let registry = seeded(&[(302, "Moved elsewhere"), (502, "Upstream unavailable")]);
        let failure = UpstreamFailure::from_response(302, json!({"message": "Found"}));

        let envelope = quiet_classifier().classify(failure.into(), Some(&registry));

        assert_eq!(envelope.status_code, 502);
        assert_eq!(envelope.message, "Upstream unavailable");
    }

    #[test]
    fn test_upstream_without_response_falls_back_to_500() {
        let failure = UpstreamFailure::unreachable("connect ECONNREFUSED 127.0.0.1:80");

        let envelope = quiet_classifier().classify(failure.into(), None);

        assert_eq!(envelope.status_code, 500);
        assert_eq!(
            envelope.message,
            "UpstreamError: connect ECONNREFUSED 127.0.0.1:80"
        );
    }

    #[test]
    fn test_unknown_uses_stringified_failure() {
        let envelope = quiet_classifier()
            .classify(UnknownFailure::new("Error", "Something bad").into(), None);

        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.message, "Error: Something bad");
        assert_eq!(
            envelope.details,
            Some(json!({"message": "Error: Something bad"}))
        );
    }

    #[test]
    fn test_unknown_respects_seeded_500() {
        let registry = seeded(&[(500, "Something went wrong")]);

        let envelope = quiet_classifier()
            .classify(UnknownFailure::new("Error", "secret detail").into(), Some(&registry));

        assert_eq!(envelope.message, "Something went wrong");
    }

    #[test]
    fn test_shared_registry_keeps_first_fallback() {
        let registry = OverrideRegistry::new();
        let classifier = quiet_classifier();

        classifier.classify(UnknownFailure::new("Error", "first").into(), Some(&registry));
        let second =
            classifier.classify(UnknownFailure::new("Error", "second").into(), Some(&registry));

        assert_eq!(second.message, "Error: first");
    }

    #[test]
    fn test_null_json_is_internal_error() {
        let envelope = quiet_classifier().classify(Failure::from_json(Value::Null), None);

        assert_eq!(envelope.status_code, 500);
        assert!(!envelope.message.is_empty());
    }
}
