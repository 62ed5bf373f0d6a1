use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use error_boundary::{
    api::{create_router, AppState, Controller},
    infrastructure::auth::JwtCredentialVerifier,
    telemetry, Classifier, Config, TokenValidator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;

    telemetry::init_tracing(&config.logging)?;
    info!(app = %config.app_name, "Starting error boundary demo service");

    let overrides = config.override_registry();
    info!(count = overrides.len(), "Error overrides loaded");

    let controller = Arc::new(Controller::new(Classifier::default(), overrides));

    let token_validator = match &config.auth_secret {
        Some(secret) => {
            let verifier = JwtCredentialVerifier::new(secret.as_bytes());
            Some(Arc::new(TokenValidator::new(Arc::new(verifier))))
        }
        None => {
            warn!("AUTH_SECRET not set, protected routes are disabled");
            None
        }
    };

    let app = create_router(AppState {
        controller,
        token_validator,
    });

    // Start server
    info!("Listening on {}", config.listen_addr);
    let listener = TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
