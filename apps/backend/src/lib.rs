#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod state;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use auth::jwt::{mint_token, validate_token, AuthFailure, Claims};
pub use config::db::db_url;
pub use config::settings::AppSettings;
pub use error::AppError;
pub use extractors::current_user::CurrentUser;
pub use extractors::validated_json::ValidatedJson;
pub use infra::db::connect_db;
pub use infra::state::build_state;
pub use logging::sanitize::sanitize;
pub use logging::security::security_event;
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::{RequestId, RequestTrace};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
