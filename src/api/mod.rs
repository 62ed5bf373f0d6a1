pub mod controller;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod response;
pub mod router;

pub use controller::Controller;
pub use response::send_response;
pub use router::{create_router, AppState};
