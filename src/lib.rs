//! # Error Boundary - Failure Classification for HTTP Services
//!
//! Turns any failure raised while serving a request into one canonical error
//! envelope, built on Clean Architecture principles.
//!
//! ## Architecture Layers
//!
//! - **Domain**: Envelope, failure provenances, error constructors
//! - **Application**: Override registry, classifier, token validator and ports
//! - **Infrastructure**: `tracing` logger, JWT verifier, `sqlx`/`validator` adapters
//! - **API**: Request wrapper, bearer-token middleware and demo routes
//!
//! ## Key Features
//!
//! - Provenance-driven classification (database, pre-shaped, validation,
//!   upstream, unclassified)
//! - First-write-wins message overrides per status code
//! - Bearer-token validation rendered as the 401 envelope
//!
//! ## Example Usage
//!
//! ```no_run
//! use error_boundary::{classify, ErrorEnvelope, OverrideRegistry, OverrideSeed};
//!
//! let registry = OverrideRegistry::create(vec![OverrideSeed::new(404, "Resource missing")]);
//! let envelope = classify(ErrorEnvelope::not_found("User 42").into(), Some(&registry));
//! assert_eq!(envelope.message, "Resource missing");
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

// Re-export key types explicitly to avoid ambiguity
pub use application::{
    classify, ports, Classifier, OverrideEntry, OverrideRegistry, OverrideSeed, TokenValidator,
    ValidatedToken,
};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::{ErrorCategory, ErrorEnvelope, ErrorKind, Failure};
