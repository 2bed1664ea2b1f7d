//! HTTP layer for LiqureMate.

pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;

pub use routes::router;
pub use session::{SessionConfig, SessionRegistry};
pub use state::AppState;
