use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::error::AppError;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    db: Option<DatabaseConnection>,
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
}

impl AppState {
    /// Create a new AppState with the given database connection and security config
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
        }
    }

    /// Create a new AppState without a database connection (for testing
    /// and for routes that must stay up when the database is down)
    pub fn without_db(security: SecurityConfig) -> Self {
        Self { db: None, security }
    }

    /// The database connection, or a database error when none is configured.
    pub fn db(&self) -> Result<&DatabaseConnection, AppError> {
        self.db
            .as_ref()
            .ok_or_else(|| AppError::db("no database connection configured"))
    }

    /// Whether a connection was configured, without forcing an error.
    pub fn has_db(&self) -> bool {
        self.db.is_some()
    }
}
