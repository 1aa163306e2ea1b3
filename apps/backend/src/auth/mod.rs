pub mod jwt;

pub use jwt::{mint_token, validate_token, AuthFailure, Claims};
