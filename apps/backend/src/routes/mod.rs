use actix_web::web;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::AppError;

pub mod health;
pub mod ideas;
pub mod notes;
pub mod projects;
pub mod reminders;
pub mod tasks;

/// Mounts all routes under their canonical scopes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health is unauthenticated by design.
    cfg.service(web::scope("/health").configure(health::configure_routes));

    cfg.service(web::scope("/api/v1/projects").configure(projects::configure_routes));
    cfg.service(web::scope("/api/v1/tasks").configure(tasks::configure_routes));
    cfg.service(web::scope("/api/v1/ideas").configure(ideas::configure_routes));
    cfg.service(web::scope("/api/v1/reminders").configure(reminders::configure_routes));
    cfg.service(web::scope("/api/v1/notes").configure(notes::configure_routes));
}

pub(crate) fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string())
}

pub(crate) fn parse_timestamp(field: &str, raw: &str) -> Result<OffsetDateTime, AppError> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .map_err(|_| AppError::validation(format!("{field} must be an RFC 3339 timestamp")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn formats_rfc3339() {
        let ts = datetime!(2025-10-20 14:30:00 UTC);
        assert_eq!(format_timestamp(ts), "2025-10-20T14:30:00Z");
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = parse_timestamp("due_time", "next tuesday").unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn parse_roundtrips() {
        let ts = parse_timestamp("due_date", "2025-10-20T14:30:00Z").unwrap();
        assert_eq!(ts, datetime!(2025-10-20 14:30:00 UTC));
    }
}
