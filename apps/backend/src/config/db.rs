use std::env;

use crate::error::AppError;

/// Builds the database URL from environment variables.
///
/// `DATABASE_URL` wins when present; otherwise the URL is assembled from
/// the individual `POSTGRES_*` pieces.
pub fn db_url() -> Result<String, AppError> {
    if let Ok(url) = env::var("DATABASE_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }

    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
    let db_name = require("POSTGRES_DB")?;
    let username = require("POSTGRES_USER")?;
    let password = require("POSTGRES_PASSWORD")?;

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

fn require(name: &str) -> Result<String, AppError> {
    let value =
        env::var(name).map_err(|_| AppError::config(format!("{name} must be set")))?;
    if value.trim().is_empty() {
        return Err(AppError::config(format!("{name} must not be empty")));
    }
    Ok(value)
}
