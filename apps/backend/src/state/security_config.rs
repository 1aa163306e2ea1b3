use jsonwebtoken::Algorithm;

/// Seconds a token's `iat` may sit ahead of server time before we treat it
/// as forged. Inclusive boundary: exactly this far ahead still passes.
pub const ISSUED_AT_GRACE_SECS: i64 = 60;

/// Configuration for JWT validation.
///
/// Constructed once at startup and injected through `AppState`; the
/// validator never reads process-global state.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Symmetric secret for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// The single accepted algorithm; anything else is rejected
    pub algorithm: Algorithm,
    /// Expected `aud` claim
    pub audience: String,
    /// The single accepted identity provider (`app_metadata.provider`)
    pub provider: String,
    /// Clock-skew grace for `iat`, in seconds
    pub iat_grace_secs: i64,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret and the
    /// product defaults for the policy fields.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            audience: "authenticated".to_string(),
            provider: "google".to_string(),
            iat_grace_secs: ISSUED_AT_GRACE_SECS,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
