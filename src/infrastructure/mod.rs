pub mod auth;
pub mod failures;
pub mod logging;
