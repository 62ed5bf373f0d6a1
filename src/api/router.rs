use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::controller::Controller;
use crate::api::handlers::{echo_handler, health_handler, not_found_handler, session_handler};
use crate::api::middleware::require_bearer_token;
use crate::api::openapi::openapi_json;
use crate::application::TokenValidator;

/// Application state container
#[derive(Debug, Clone)]
pub struct AppState {
    pub controller: Arc<Controller>,
    /// `None` disables the protected routes
    pub token_validator: Option<Arc<TokenValidator>>,
}

/// Create router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let mut api = Router::new().route("/v1/echo", post(echo_handler));

    if let Some(validator) = state.token_validator {
        let protected = Router::new()
            .route("/v1/session", get(session_handler))
            .route_layer(axum_middleware::from_fn_with_state(
                validator,
                require_bearer_token,
            ));
        api = api.merge(protected);
    }

    Router::new()
        // Health check and docs (no auth required)
        .route("/health", get(health_handler))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        .fallback(not_found_handler)
        .with_state(state.controller)
}
