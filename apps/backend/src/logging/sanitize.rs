use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Centralized registry for secret-redaction regex patterns.
///
/// All patterns used to scrub credentials out of log output live here,
/// with a single allow per pattern construction site.
pub struct SecretRegexRegistry;

impl SecretRegexRegistry {
    /// Bearer credential pattern (case-insensitive scheme)
    /// SAFETY: This regex pattern is a vetted literal that compiles successfully
    pub fn bearer() -> &'static Regex {
        static BEARER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"(?i)bearer\s+[\w\-.]+").unwrap()
        });
        &BEARER_REGEX
    }

    /// JWT-shaped substrings: base64url segments starting with the compact
    /// serialization header prefix
    /// SAFETY: This regex pattern is a vetted literal that compiles successfully
    pub fn jwt() -> &'static Regex {
        static JWT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"eyJ[\w\-.]+").unwrap()
        });
        &JWT_REGEX
    }

    /// `key=value` / `key: value` pairs whose key names a secret
    /// SAFETY: This regex pattern is a vetted literal that compiles successfully
    pub fn keyed_secret() -> &'static Regex {
        static KEYED_SECRET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"(?i)(jwt_secret|api_key|secret_key|password|token)[\s:=]+[\w\-.]+")
                .unwrap()
        });
        &KEYED_SECRET_REGEX
    }
}

/// Redacts credential-like substrings from a string.
///
/// Order: bearer credentials first (they swallow the token that follows),
/// then bare JWTs, then keyword-labelled secrets. The replacements contain
/// no characters the patterns match, so applying the function twice yields
/// the same output.
///
/// This is defense-in-depth: callers still must not log raw secrets on
/// purpose; this is the last line before emission.
pub fn sanitize(input: &str) -> String {
    let bearer = SecretRegexRegistry::bearer().replace_all(input, "Bearer [REDACTED]");
    let jwt = SecretRegexRegistry::jwt().replace_all(&bearer, "[REDACTED_JWT]");
    SecretRegexRegistry::keyed_secret()
        .replace_all(&jwt, "${1}=[REDACTED]")
        .to_string()
}

/// A wrapper that redacts on display, for ergonomic use in log fields.
pub struct Sanitized<'a>(pub &'a str);

impl<'a> fmt::Display for Sanitized<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", sanitize(self.0))
    }
}

impl<'a> fmt::Debug for Sanitized<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", sanitize(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_tokens_are_redacted() {
        let out = sanitize("rejected header Bearer abc.def.ghi from client");
        assert_eq!(out, "rejected header Bearer [REDACTED] from client");
        assert!(!out.contains("abc.def.ghi"));
    }

    #[test]
    fn bearer_scheme_matches_case_insensitively() {
        assert_eq!(sanitize("BEARER abc123"), "Bearer [REDACTED]");
        assert_eq!(sanitize("bearer abc123"), "Bearer [REDACTED]");
    }

    #[test]
    fn jwt_shaped_strings_are_redacted() {
        let out = sanitize("decode failed for eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxIn0.sig");
        assert_eq!(out, "decode failed for [REDACTED_JWT]");
    }

    #[test]
    fn keyed_secrets_are_redacted() {
        assert_eq!(sanitize("jwt_secret=supersecret"), "jwt_secret=[REDACTED]");
        assert_eq!(sanitize("password: hunter2"), "password=[REDACTED]");
        assert_eq!(sanitize("API_KEY=deadbeef"), "API_KEY=[REDACTED]");
        assert_eq!(sanitize("token = abc.def"), "token=[REDACTED]");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let samples = [
            "Bearer abc.def.ghi",
            "eyJhbGciOiJIUzI1NiJ9.payload.sig",
            "jwt_secret=supersecret and Bearer eyJxyz",
            "nothing sensitive here",
        ];
        for sample in samples {
            let once = sanitize(sample);
            let twice = sanitize(&once);
            assert_eq!(once, twice, "double-sanitizing {sample:?} changed output");
        }
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(sanitize("hello world"), "hello world");
        assert_eq!(sanitize(""), "");
        assert_eq!(
            sanitize("Expected provider='google', got 'github'"),
            "Expected provider='google', got 'github'"
        );
    }

    #[test]
    fn sanitized_wrapper_redacts_on_display() {
        let wrapped = Sanitized("Bearer abc.def");
        assert_eq!(format!("{wrapped}"), "Bearer [REDACTED]");
        assert_eq!(format!("{wrapped:?}"), "Bearer [REDACTED]");
    }
}
