pub mod echo;
pub mod fallback;
pub mod health;
pub mod session;

pub use echo::{echo_handler, EchoRequest, EchoResponse};
pub use fallback::not_found_handler;
pub use health::{health_handler, HealthResponse};
pub use session::{session_handler, SessionResponse};
