use std::sync::Arc;

use axum::{extract::State, http::Method, http::Uri, response::Response};

use crate::api::controller::Controller;
use crate::domain::ErrorEnvelope;

/// Any unmatched route
pub async fn not_found_handler(
    State(controller): State<Arc<Controller>>,
    method: Method,
    uri: Uri,
) -> Response {
    let service = format!("{} {}", method, uri.path());
    let message = format!("No route for {}", service);

    controller
        .handle(&service, async move {
            Err::<(), _>(ErrorEnvelope::not_found(message))
        })
        .await
}
