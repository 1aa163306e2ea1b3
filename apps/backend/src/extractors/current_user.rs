//! Authenticated caller extractor.
//!
//! Handlers add a `CurrentUser` parameter to require authentication; the
//! extractor runs the full credential validation pipeline and rejects the
//! request with a generic 401 before the handler body executes.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpMessage, HttpRequest};

use crate::auth::jwt::{validate_token, AuthFailure};
use crate::error::AppError;
use crate::logging::security_event;
use crate::middleware::request_trace::RequestId;
use crate::state::AppState;

/// Identity established from a validated access token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Token `sub` claim, used to scope every query.
    pub user_id: String,
}

/// Header-level rejections happen before the validator runs, so they are
/// recorded here, tagged with the request id when the trace middleware
/// assigned one.
fn log_header_failure(req: &HttpRequest, details: &str) {
    let request_id = req.extensions().get::<RequestId>().map(|id| id.0.clone());
    let metadata = request_id.as_deref().map(|id| [("request_id", id)]);
    security_event(
        "invalid_jwt_format",
        None,
        Some(details),
        metadata.as_ref().map(|m| &m[..]),
    );
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::config("application state not configured"))?;

            let credential = match req.headers().get(header::AUTHORIZATION) {
                Some(value) => value.to_str().map_err(|_| {
                    log_header_failure(&req, "Authorization header is not valid UTF-8");
                    AppError::from(AuthFailure::InvalidToken)
                })?,
                None => {
                    log_header_failure(&req, "Authorization header missing");
                    return Err(AppError::from(AuthFailure::InvalidToken));
                }
            };

            let user_id = validate_token(credential, &state.security)?;
            Ok(CurrentUser { user_id })
        })
    }
}
