use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::logging::security::security_event;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Upper bound on the Authorization header we will even look at.
/// Anything larger is rejected before parsing.
const MAX_CREDENTIAL_LEN: usize = 8192;

/// Test/dev token TTL for `mint_token`. Production tokens come from the
/// external identity provider with its own expiry policy.
const MINT_TTL_SECS: i64 = 15 * 60;

/// Nested metadata namespace carrying the identity-provider claim.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AppMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Claims carried by provider-issued access tokens.
///
/// Every field is optional at the decode step so that absence is detected
/// by our own presence check (and reported as `jwt_missing_claims` with
/// claim names) instead of surfacing as an opaque deserialization error.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Claims {
    /// Opaque external user identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Issued-at (seconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiry (seconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_metadata: Option<AppMetadata>,
}

/// The only two signals a failed validation may emit to the caller.
/// The specific internal reason goes to the security event sink instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    InvalidToken,
    ExpiredToken,
}

impl AuthFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthFailure::InvalidToken => "invalid_token",
            AuthFailure::ExpiredToken => "expired_token",
        }
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal, fully-specific failure reason. Collapsed to an `AuthFailure`
/// before it leaves this module; used directly by unit tests and by the
/// event sink.
#[derive(Debug)]
pub(crate) enum ValidationFailure {
    InvalidFormat { reason: &'static str },
    Jwt(jsonwebtoken::errors::Error),
    MissingClaims { present: Vec<&'static str> },
    InvalidProvider { expected: String, actual: Option<String> },
    FutureIssuedAt { iat: i64, now: i64 },
}

impl ValidationFailure {
    pub(crate) fn event_type(&self) -> String {
        match self {
            ValidationFailure::InvalidFormat { .. } => "invalid_jwt_format".to_string(),
            ValidationFailure::Jwt(e) => {
                format!("jwt_validation_failed_{}", jwt_error_name(e))
            }
            ValidationFailure::MissingClaims { .. } => "jwt_missing_claims".to_string(),
            ValidationFailure::InvalidProvider { .. } => "jwt_invalid_provider".to_string(),
            ValidationFailure::FutureIssuedAt { .. } => "jwt_future_iat".to_string(),
        }
    }

    /// Detail string for the event sink. Claim names and provider names
    /// are safe to include; claim values and tokens are not.
    pub(crate) fn details(&self) -> String {
        match self {
            ValidationFailure::InvalidFormat { reason } => (*reason).to_string(),
            ValidationFailure::Jwt(e) => format!("JWT validation error: {}", jwt_error_name(e)),
            ValidationFailure::MissingClaims { present } => {
                format!("Missing required claims. Has: {present:?}")
            }
            ValidationFailure::InvalidProvider { expected, actual } => format!(
                "Expected provider='{expected}', got '{}'",
                actual.as_deref().unwrap_or("none")
            ),
            ValidationFailure::FutureIssuedAt { iat, now } => {
                format!("Token iat is in the future: {iat} > {now}")
            }
        }
    }

    pub(crate) fn outward(&self) -> AuthFailure {
        match self {
            ValidationFailure::Jwt(e)
                if matches!(
                    e.kind(),
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature
                ) =>
            {
                AuthFailure::ExpiredToken
            }
            _ => AuthFailure::InvalidToken,
        }
    }
}

fn jwt_error_name(e: &jsonwebtoken::errors::Error) -> &'static str {
    use jsonwebtoken::errors::ErrorKind;
    match e.kind() {
        ErrorKind::ExpiredSignature => "expired_signature",
        ErrorKind::InvalidSignature => "invalid_signature",
        ErrorKind::InvalidAlgorithm => "invalid_algorithm",
        ErrorKind::InvalidAudience => "invalid_audience",
        ErrorKind::MissingRequiredClaim(_) => "missing_required_claim",
        ErrorKind::ImmatureSignature => "immature_signature",
        _ => "malformed_token",
    }
}

/// Validate a raw `Authorization` header value and return the `sub` claim.
///
/// The `sub` string is the ONLY claim that crosses this boundary; nothing
/// else from the token is observable downstream. Every failure records a
/// security event with the specific reason and collapses outward to
/// `invalid_token` or `expired_token`.
pub fn validate_token(credential: &str, security: &SecurityConfig) -> Result<String, AuthFailure> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    validate_credential(credential, security, now).map_err(|failure| {
        security_event(&failure.event_type(), None, Some(&failure.details()), None);
        failure.outward()
    })
}

/// Validation pipeline with an injectable clock for the issued-at check.
///
/// Check order is deliberate, cheapest and least revealing first: format,
/// then signature/algorithm/audience/expiry (library-enforced), then claim
/// presence, then business-rule claims.
pub(crate) fn validate_credential(
    credential: &str,
    security: &SecurityConfig,
    now: i64,
) -> Result<String, ValidationFailure> {
    if credential.len() > MAX_CREDENTIAL_LEN {
        return Err(ValidationFailure::InvalidFormat {
            reason: "Authorization header exceeds maximum length",
        });
    }

    // Exact, case-sensitive scheme match.
    let token = credential
        .strip_prefix("Bearer ")
        .ok_or(ValidationFailure::InvalidFormat {
            reason: "Authorization header missing 'Bearer ' prefix",
        })?;

    let mut validation = Validation::new(security.algorithm);
    validation.leeway = 0;
    validation.set_audience(&[security.audience.as_str()]);
    // Absent spec claims are reported by our own presence check below, as
    // `jwt_missing_claims` with the names seen, not as a decode error.
    validation.required_spec_claims = Default::default();

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map_err(ValidationFailure::Jwt)?;
    let claims = data.claims;

    // Required-claim presence; empty strings and zero timestamps count as
    // missing, mirroring the provider contract.
    let sub = claims.sub.filter(|s| !s.is_empty());
    let email = claims.email.filter(|s| !s.is_empty());
    let role = claims.role.filter(|s| !s.is_empty());
    let iat = claims.iat.filter(|v| *v != 0);
    let exp = claims.exp.filter(|v| *v != 0);

    let mut present = Vec::new();
    for (name, is_present) in [
        ("sub", sub.is_some()),
        ("email", email.is_some()),
        ("role", role.is_some()),
        ("iat", iat.is_some()),
        ("exp", exp.is_some()),
    ] {
        if is_present {
            present.push(name);
        }
    }

    let (Some(sub), Some(_email), Some(_role), Some(iat), Some(_exp)) =
        (sub, email, role, iat, exp)
    else {
        return Err(ValidationFailure::MissingClaims { present });
    };

    // Provider pinning: exactly one accepted identity provider.
    let provider = claims.app_metadata.and_then(|m| m.provider);
    if provider.as_deref() != Some(security.provider.as_str()) {
        return Err(ValidationFailure::InvalidProvider {
            expected: security.provider.clone(),
            actual: provider,
        });
    }

    // Clock-skew guard: reject tokens claiming to be issued in the future.
    // Inclusive boundary: iat == now + grace still passes.
    if iat > now + security.iat_grace_secs {
        return Err(ValidationFailure::FutureIssuedAt { iat, now });
    }

    Ok(sub)
}

/// Mint an HS256 access token matching the provider's claim shape.
/// For tests and local dev tooling only; production tokens are issued by
/// the external identity provider.
pub fn mint_token(
    sub: &str,
    email: &str,
    role: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time".to_string()))?
        .as_secs() as i64;

    let claims = Claims {
        sub: Some(sub.to_string()),
        email: Some(email.to_string()),
        role: Some(role.to_string()),
        iat: Some(iat),
        exp: Some(iat + MINT_TTL_SECS),
        aud: Some(security.audience.clone()),
        app_metadata: Some(AppMetadata {
            provider: Some(security.provider.clone()),
        }),
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde_json::json;
    use time::OffsetDateTime;

    use super::*;

    fn security() -> SecurityConfig {
        SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes())
    }

    fn now() -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }

    /// Encode arbitrary claims so tests can construct malformed tokens.
    fn encode_claims(claims: &serde_json::Value, alg: Algorithm, secret: &[u8]) -> String {
        encode(&Header::new(alg), claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn full_claims() -> serde_json::Value {
        json!({
            "sub": "550e8400-e29b-41d4-a716-446655440000",
            "email": "user@example.com",
            "role": "authenticated",
            "iat": now() - 10,
            "exp": now() + 3600,
            "aud": "authenticated",
            "app_metadata": {"provider": "google"},
        })
    }

    #[test]
    fn roundtrip_returns_exactly_the_sub() {
        let security = security();
        let token = mint_token(
            "sub-roundtrip-123",
            "user@example.com",
            "authenticated",
            SystemTime::now(),
            &security,
        )
        .unwrap();

        let sub = validate_token(&format!("Bearer {token}"), &security).unwrap();
        assert_eq!(sub, "sub-roundtrip-123");
    }

    #[test]
    fn missing_bearer_prefix_is_a_format_failure() {
        let security = security();
        let err = validate_credential("BEARER xyz", &security, now()).unwrap_err();
        assert!(matches!(err, ValidationFailure::InvalidFormat { .. }));
        assert_eq!(err.event_type(), "invalid_jwt_format");
        assert_eq!(err.outward(), AuthFailure::InvalidToken);

        // Public wrapper collapses to the generic outward signal.
        let outward = validate_token("token-without-scheme", &security).unwrap_err();
        assert_eq!(outward.as_str(), "invalid_token");
    }

    #[test]
    fn oversized_credential_is_rejected_before_parsing() {
        let security = security();
        let huge = format!("Bearer {}", "a".repeat(9000));
        let err = validate_credential(&huge, &security, now()).unwrap_err();
        assert!(matches!(err, ValidationFailure::InvalidFormat { .. }));
    }

    #[test]
    fn wrong_algorithm_is_invalid_token_never_algorithm_specific() {
        let security = security();
        let token = encode_claims(&full_claims(), Algorithm::HS384, &security.jwt_secret);
        let credential = format!("Bearer {token}");

        let err = validate_credential(&credential, &security, now()).unwrap_err();
        assert!(matches!(err, ValidationFailure::Jwt(_)));
        assert!(err.event_type().starts_with("jwt_validation_failed_"));

        let outward = validate_token(&credential, &security).unwrap_err();
        assert_eq!(outward.as_str(), "invalid_token");
    }

    #[test]
    fn tampered_signature_is_invalid_token() {
        let other = SecurityConfig::new("a-completely-different-secret".as_bytes());
        let token = encode_claims(&full_claims(), Algorithm::HS256, &other.jwt_secret);

        let outward = validate_token(&format!("Bearer {token}"), &security()).unwrap_err();
        assert_eq!(outward.as_str(), "invalid_token");
    }

    #[test]
    fn expired_token_is_expired_token() {
        let security = security();
        let mut claims = full_claims();
        claims["iat"] = json!(now() - 7200);
        claims["exp"] = json!(now() - 3600);
        let token = encode_claims(&claims, Algorithm::HS256, &security.jwt_secret);

        let outward = validate_token(&format!("Bearer {token}"), &security).unwrap_err();
        assert_eq!(outward.as_str(), "expired_token");
    }

    #[test]
    fn wrong_audience_is_invalid_token() {
        let security = security();
        let mut claims = full_claims();
        claims["aud"] = json!("somebody-else");
        let token = encode_claims(&claims, Algorithm::HS256, &security.jwt_secret);

        let err =
            validate_credential(&format!("Bearer {token}"), &security, now()).unwrap_err();
        assert!(matches!(err, ValidationFailure::Jwt(_)));
        assert_eq!(err.outward(), AuthFailure::InvalidToken);
    }

    #[test]
    fn missing_claim_reports_present_claim_names_only() {
        let security = security();
        let mut claims = full_claims();
        claims.as_object_mut().unwrap().remove("email");
        let token = encode_claims(&claims, Algorithm::HS256, &security.jwt_secret);

        let err =
            validate_credential(&format!("Bearer {token}"), &security, now()).unwrap_err();
        match &err {
            ValidationFailure::MissingClaims { present } => {
                assert!(present.contains(&"sub"));
                assert!(present.contains(&"role"));
                assert!(!present.contains(&"email"));
            }
            other => panic!("expected MissingClaims, got {other:?}"),
        }
        assert_eq!(err.event_type(), "jwt_missing_claims");
        // Details carry claim names, never values.
        assert!(!err.details().contains("550e8400"));
        assert_eq!(err.outward(), AuthFailure::InvalidToken);
    }

    #[test]
    fn empty_string_claim_counts_as_missing() {
        let security = security();
        let mut claims = full_claims();
        claims["role"] = json!("");
        let token = encode_claims(&claims, Algorithm::HS256, &security.jwt_secret);

        let err =
            validate_credential(&format!("Bearer {token}"), &security, now()).unwrap_err();
        assert!(matches!(err, ValidationFailure::MissingClaims { .. }));
    }

    #[test]
    fn wrong_provider_is_rejected_with_expected_vs_actual() {
        let security = security();
        let mut claims = full_claims();
        claims["app_metadata"] = json!({"provider": "github"});
        let token = encode_claims(&claims, Algorithm::HS256, &security.jwt_secret);

        let err =
            validate_credential(&format!("Bearer {token}"), &security, now()).unwrap_err();
        assert_eq!(err.event_type(), "jwt_invalid_provider");
        assert!(err.details().contains("github"));
        assert!(err.details().contains("google"));
        assert_eq!(err.outward(), AuthFailure::InvalidToken);
    }

    #[test]
    fn absent_provider_namespace_is_rejected() {
        let security = security();
        let mut claims = full_claims();
        claims.as_object_mut().unwrap().remove("app_metadata");
        let token = encode_claims(&claims, Algorithm::HS256, &security.jwt_secret);

        let err =
            validate_credential(&format!("Bearer {token}"), &security, now()).unwrap_err();
        assert!(matches!(err, ValidationFailure::InvalidProvider { .. }));
        assert!(err.details().contains("'none'"));
    }

    #[test]
    fn future_iat_boundary_is_inclusive() {
        let security = security();
        let reference = now();

        // Exactly at the grace boundary: passes.
        let mut claims = full_claims();
        claims["iat"] = json!(reference + 60);
        let token = encode_claims(&claims, Algorithm::HS256, &security.jwt_secret);
        let sub = validate_credential(&format!("Bearer {token}"), &security, reference).unwrap();
        assert_eq!(sub, "550e8400-e29b-41d4-a716-446655440000");

        // One second past: rejected.
        claims["iat"] = json!(reference + 61);
        let token = encode_claims(&claims, Algorithm::HS256, &security.jwt_secret);
        let err =
            validate_credential(&format!("Bearer {token}"), &security, reference).unwrap_err();
        assert_eq!(err.event_type(), "jwt_future_iat");
        assert_eq!(err.outward(), AuthFailure::InvalidToken);
    }

    #[test]
    fn mint_then_validate_with_skewed_clock_fails_expired() {
        let security = security();
        // Minted 20 minutes ago; 15-minute TTL means it's expired.
        let past = SystemTime::now() - Duration::from_secs(20 * 60);
        let token = mint_token("sub-expired", "user@example.com", "authenticated", past, &security)
            .unwrap();

        let outward = validate_token(&format!("Bearer {token}"), &security).unwrap_err();
        assert_eq!(outward, AuthFailure::ExpiredToken);
    }
}
