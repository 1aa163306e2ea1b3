pub mod sanitize;
pub mod security;

pub use sanitize::{sanitize, Sanitized};
pub use security::security_event;
