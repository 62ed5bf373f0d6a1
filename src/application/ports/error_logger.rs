#[cfg(test)]
use mockall::{automock, predicate::*};

use crate::domain::Failure;

/// Port for the diagnostics sink used at the request boundary
///
/// Calls are fire-and-forget: implementations must swallow their own
/// delivery problems so that envelope production never depends on them.
#[cfg_attr(test, automock)]
pub trait ErrorLogger: Send + Sync {
    /// Record a failure before it is classified
    fn log_failure(&self, failure: &Failure);

    /// Record a plain error message
    fn log_error(&self, message: &str);
}
