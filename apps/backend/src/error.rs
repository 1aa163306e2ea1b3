use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::auth::jwt::AuthFailure;
use crate::logging::sanitize::Sanitized;
use crate::logging::security::security_event;

/// Wire shape for every error response: `{"detail": ...}`, with an
/// `errors` array added for request-schema failures.
#[derive(Serialize)]
pub struct ErrorBody {
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Log-level selector. Never used for control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("authentication failed: {0}")]
    Authentication(AuthFailure),
    #[error("authorization failed: {detail}")]
    Authorization { detail: String },
    #[error("validation error: {detail}")]
    Validation { detail: String },
    #[error("invalid request body")]
    InvalidRequest { errors: Vec<String> },
    #[error("database error: {detail}")]
    Database { detail: String },
    #[error("configuration error: {detail}")]
    Config { detail: String },
    #[error("internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    pub fn authorization(detail: impl Into<String>) -> Self {
        Self::Authorization {
            detail: detail.into(),
        }
    }

    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation {
            detail: detail.into(),
        }
    }

    pub fn invalid_request(errors: Vec<String>) -> Self {
        Self::InvalidRequest { errors }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Database {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    /// Get the HTTP status code for this error.
    ///
    /// Authorization failures map to 404, never 403: distinguishing
    /// "doesn't exist" from "exists but not yours" would leak resource
    /// existence to an unauthorized caller.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization { .. } => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            AppError::Authentication(_) => "authentication",
            AppError::Authorization { .. } => "authorization",
            AppError::Validation { .. } | AppError::InvalidRequest { .. } => "validation",
            AppError::Database { .. } => "database",
            AppError::Config { .. } => "configuration",
            AppError::Internal { .. } => "internal",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            AppError::Authentication(_) | AppError::Authorization { .. } => Severity::Medium,
            AppError::Validation { .. } | AppError::InvalidRequest { .. } => Severity::Low,
            AppError::Database { .. } | AppError::Internal { .. } => Severity::High,
            AppError::Config { .. } => Severity::Critical,
        }
    }

    /// The user-facing message. Validation messages pass through verbatim;
    /// everything else collapses to a fixed generic string so internal
    /// detail never reaches the caller.
    fn outward_detail(&self) -> String {
        match self {
            AppError::Authentication(_) => "Authentication failed".to_string(),
            AppError::Authorization { .. } => "Resource not found".to_string(),
            AppError::Validation { detail } => detail.clone(),
            AppError::InvalidRequest { .. } => "Invalid request".to_string(),
            AppError::Database { .. } | AppError::Internal { .. } => {
                "Internal server error".to_string()
            }
            AppError::Config { .. } => "Server configuration error".to_string(),
        }
    }

    /// Server-side record of the failure. Authentication and authorization
    /// failures always go through the security event sink; the rest log at
    /// a level chosen by severity. Validation failures carry no secrets and
    /// need no audit trail.
    fn log(&self) {
        match self {
            AppError::Authentication(failure) => {
                security_event("authentication_failed", None, Some(failure.as_str()), None);
            }
            AppError::Authorization { detail } => {
                security_event("authorization_failed", None, Some(detail), None);
            }
            _ => {
                // Detail strings may quote request input; scrub before emission.
                let detail = self.to_string();
                let error = Sanitized(&detail);
                match self.severity() {
                    Severity::Low => {
                        tracing::debug!(category = self.category(), %error, "request failed")
                    }
                    Severity::Medium => {
                        tracing::warn!(category = self.category(), %error, "request failed")
                    }
                    Severity::High | Severity::Critical => {
                        tracing::error!(category = self.category(), %error, "request failed")
                    }
                }
            }
        }
    }
}

impl From<AuthFailure> for AppError {
    fn from(failure: AuthFailure) -> Self {
        AppError::Authentication(failure)
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::db(format!("db error: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        self.log();

        let body = ErrorBody {
            detail: self.outward_detail(),
            errors: match self {
                AppError::InvalidRequest { errors } => Some(errors.clone()),
                _ => None,
            },
        };

        HttpResponse::build(self.status()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(err: &AppError) -> Value {
        let resp = err.error_response();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn authentication_maps_to_generic_401() {
        let err = AppError::from(AuthFailure::InvalidToken);
        assert_eq!(err.status().as_u16(), 401);
        let json = body_json(&err).await;
        assert_eq!(json["detail"], "Authentication failed");
        assert!(json.get("errors").is_none());
    }

    #[actix_web::test]
    async fn authorization_maps_to_404_never_403() {
        let err = AppError::authorization("project 42 belongs to someone else");
        assert_eq!(err.status().as_u16(), 404);
        let json = body_json(&err).await;
        assert_eq!(json["detail"], "Resource not found");
    }

    #[actix_web::test]
    async fn validation_detail_passes_through() {
        let err = AppError::validation("No fields to update");
        assert_eq!(err.status().as_u16(), 400);
        let json = body_json(&err).await;
        assert_eq!(json["detail"], "No fields to update");
    }

    #[actix_web::test]
    async fn invalid_request_carries_field_errors() {
        let err = AppError::invalid_request(vec!["missing field `name`".to_string()]);
        assert_eq!(err.status().as_u16(), 400);
        let json = body_json(&err).await;
        assert_eq!(json["detail"], "Invalid request");
        assert_eq!(json["errors"][0], "missing field `name`");
    }

    #[actix_web::test]
    async fn infrastructure_errors_never_leak_detail() {
        let db = AppError::db("connection refused to 10.0.0.5:5432");
        assert_eq!(db.status().as_u16(), 500);
        let json = body_json(&db).await;
        assert_eq!(json["detail"], "Internal server error");

        let config = AppError::config("BACKEND_JWT_SECRET is empty");
        let json = body_json(&config).await;
        assert_eq!(json["detail"], "Server configuration error");

        let internal = AppError::internal("slipped through");
        let json = body_json(&internal).await;
        assert_eq!(json["detail"], "Internal server error");
    }

    #[test]
    fn severity_and_category_tags() {
        assert_eq!(
            AppError::from(AuthFailure::ExpiredToken).category(),
            "authentication"
        );
        assert_eq!(AppError::authorization("x").severity(), Severity::Medium);
        assert_eq!(AppError::validation("x").severity(), Severity::Low);
        assert_eq!(AppError::db("x").severity(), Severity::High);
        assert_eq!(AppError::config("x").severity(), Severity::Critical);
    }
}
