use std::fmt::Write as _;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::warn;

use crate::logging::sanitize::sanitize;

/// Record a security event: failed authentication, rejected tokens,
/// ownership violations.
///
/// Every string value passes through the sanitizer before emission, and
/// nothing in here can fail: a logging problem must never break the
/// request that triggered it.
pub fn security_event(
    event_type: &str,
    user_id: Option<&str>,
    details: Option<&str>,
    metadata: Option<&[(&str, &str)]>,
) {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let details = details.map(sanitize);
    let metadata = metadata.map(|pairs| {
        let mut out = String::new();
        for (key, value) in pairs {
            let _ = write!(out, "{key}={} ", sanitize(value));
        }
        out.trim_end().to_string()
    });

    warn!(
        event = "SECURITY_EVENT",
        event_type,
        %timestamp,
        user_id = user_id.unwrap_or("-"),
        details = details.as_deref().unwrap_or("-"),
        metadata = metadata.as_deref().unwrap_or("-"),
        "Security event"
    );
}
