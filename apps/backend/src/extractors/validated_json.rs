//! JSON body extractor with standardized failure responses.
//!
//! Deserialization failures become a 400 with the shared invalid-request
//! body shape instead of actix's default plain-text error.

use std::ops::{Deref, DerefMut};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Error as JsonError;
use tracing::debug;

use crate::error::AppError;

/// Request bodies larger than this are rejected before parsing.
const MAX_BODY_BYTES: usize = 256 * 1024;

#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(_req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut payload = payload.take();

        Box::pin(async move {
            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    debug!(error = %e, "failed to read request body chunk");
                    AppError::invalid_request(vec!["Failed to read request body".to_string()])
                })?;
                if body.len() + chunk.len() > MAX_BODY_BYTES {
                    return Err(AppError::invalid_request(vec![
                        "Request body too large".to_string(),
                    ]));
                }
                body.extend_from_slice(&chunk);
            }

            let parsed = serde_json::from_slice::<T>(&body).map_err(|e| {
                let detail = classify_json_error(&e);
                debug!(body_size = body.len(), "JSON parsing failed");
                AppError::invalid_request(vec![detail])
            })?;

            Ok(ValidatedJson(parsed))
        })
    }
}

/// Maps a serde error onto a message safe to echo back to the client.
fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            format!("Invalid JSON at line {}", error.line())
        }
        serde_json::error::Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        serde_json::error::Category::Data => error.to_string(),
        serde_json::error::Category::Io => "Failed to read request body".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_truncated_json_as_eof() {
        let err = serde_json::from_str::<serde_json::Value>("{\"a\":").unwrap_err();
        assert_eq!(
            classify_json_error(&err),
            "Invalid JSON: unexpected end of input"
        );
    }

    #[test]
    fn classifies_syntax_error_with_line() {
        let err = serde_json::from_str::<serde_json::Value>("{oops}").unwrap_err();
        assert!(classify_json_error(&err).starts_with("Invalid JSON at line "));
    }
}
