//! Unauthenticated service health probe.

use actix_web::{web, HttpResponse};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    database_connected: bool,
    timestamp: String,
}

/// Reports liveness plus a best-effort database probe. A broken database
/// never fails this endpoint; it only flips `database_connected`.
async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let database_connected = match app_state.db() {
        Ok(db) => db
            .query_one(sea_orm::Statement::from_string(
                db.get_database_backend(),
                "SELECT 1 as health_check".to_string(),
            ))
            .await
            .is_ok(),
        Err(_) => false,
    };

    let timestamp = OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        database_connected,
        timestamp,
    }))
}

pub fn configure_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.route("", web::get().to(health));
}
