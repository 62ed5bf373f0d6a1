use std::future::Future;
use std::time::Instant;

use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, debug_span, Instrument};
use uuid::Uuid;

use crate::api::response::send_response;
use crate::application::{Classifier, OverrideRegistry};
use crate::domain::Failure;

/// Runs request handlers and turns their failures into envelopes
///
/// Each request classifies against its own copy of the override template, so
/// the 500 message registered for one failure never reaches another request.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    classifier: Classifier,
    overrides: OverrideRegistry,
}

impl Controller {
    pub fn new(classifier: Classifier, overrides: OverrideRegistry) -> Self {
        Self {
            classifier,
            overrides,
        }
    }

    pub fn overrides(&self) -> &OverrideRegistry {
        &self.overrides
    }

    /// Await the business logic and respond.
    ///
    /// `service` names the operation in logs, e.g. `"POST /v1/echo"`.
    pub async fn handle<T, E, F>(&self, service: &str, work: F) -> Response
    where
        F: Future<Output = Result<T, E>>,
        T: Serialize,
        E: Into<Failure>,
    {
        let request_id = Uuid::new_v4();
        let span = debug_span!("request", %request_id, service);

        async move {
            let start = Instant::now();
            debug!("request started");

            let response = match work.await {
                Ok(payload) => send_response(&payload),
                Err(err) => {
                    let registry = self.overrides.clone();
                    self.classifier
                        .classify(err.into(), Some(&registry))
                        .into_response()
                }
            };

            debug!(
                status = response.status().as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "request finished"
            );
            response
        }
        .instrument(span)
        .await
    }
}
