#![allow(dead_code)]

// tests/common/mod.rs
use std::time::SystemTime;

use actix_web::web;
use backend::auth::jwt::mint_token;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use tracing_subscriber::{fmt, EnvFilter};

// Logging is auto-installed for each test binary
#[ctor::ctor]
fn init_logging() {
    let filter = std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .without_time()
        .try_init()
        .ok();
}

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes())
}

/// App state for handler tests that never touch the database.
pub fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState::without_db(test_security()))
}

/// A valid `Authorization` header value for the given subject.
pub fn bearer_for(sub: &str, security: &SecurityConfig) -> String {
    let token = mint_token(
        sub,
        "user@example.com",
        "authenticated",
        SystemTime::now(),
        security,
    )
    .expect("mint test token");
    format!("Bearer {token}")
}
