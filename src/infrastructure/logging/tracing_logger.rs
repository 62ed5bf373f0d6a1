use tracing::error;

use crate::application::ports::ErrorLogger;
use crate::domain::Failure;

/// Error logger backed by `tracing`
///
/// Emits at ERROR regardless of the status the failure will end up with.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorLogger;

impl ErrorLogger for TracingErrorLogger {
    fn log_failure(&self, failure: &Failure) {
        error!(
            provenance = failure.provenance(),
            category = %failure.category(),
            failure = ?failure,
            "{}",
            failure
        );
    }

    fn log_error(&self, message: &str) {
        error!("{}", message);
    }
}
