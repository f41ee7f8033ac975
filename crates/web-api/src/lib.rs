//! HTTP surface: axum router, payload schemas and error translation.

pub mod app_config;
pub mod error;
pub mod routes;
pub mod state;

pub use app_config::{AppConfig, DatabaseConfig, PresenceConfig, ServerConfig};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
