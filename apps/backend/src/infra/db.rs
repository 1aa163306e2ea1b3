use sea_orm::{Database, DatabaseConnection};

use crate::config::db::db_url;
use crate::error::AppError;

/// Open a connection pool to the configured database.
/// This function does NOT run any migrations.
pub async fn connect_db() -> Result<DatabaseConnection, AppError> {
    let database_url = db_url()?;
    let conn = Database::connect(&database_url).await?;
    Ok(conn)
}

/// Single entrypoint for startup: connect, then bring the schema up to date.
pub async fn bootstrap_db() -> Result<DatabaseConnection, AppError> {
    let conn = connect_db().await?;
    migration::migrate(&conn, migration::MigrationCommand::Up)
        .await
        .map_err(|e| AppError::db(format!("migrations failed: {e}")))?;
    Ok(conn)
}
