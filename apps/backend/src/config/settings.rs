use std::env;

use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Process-level settings, read once at startup.
///
/// Environment variables must be set by the runtime environment (compose
/// env_file, `docker run --env-file`, or sourcing an env file locally).
/// Validation is fail-fast: a missing or empty JWT secret aborts startup
/// instead of failing per-request.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
}

impl AppSettings {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("BACKEND_PORT").unwrap_or_else(|_| "3001".to_string());
        let port = port
            .parse::<u16>()
            .map_err(|_| AppError::config(format!("BACKEND_PORT is not a valid port: {port}")))?;

        let jwt_secret = env::var("BACKEND_JWT_SECRET")
            .map_err(|_| AppError::config("BACKEND_JWT_SECRET must be set".to_string()))?;
        if jwt_secret.trim().is_empty() {
            return Err(AppError::config(
                "BACKEND_JWT_SECRET must not be empty".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            jwt_secret,
        })
    }

    pub fn security_config(&self) -> SecurityConfig {
        SecurityConfig::new(self.jwt_secret.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn clear_env() {
        env::remove_var("BACKEND_HOST");
        env::remove_var("BACKEND_PORT");
        env::remove_var("BACKEND_JWT_SECRET");
    }

    #[test]
    #[serial]
    fn missing_secret_is_a_config_error() {
        clear_env();
        let err = AppSettings::from_env().unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    #[serial]
    fn empty_secret_is_a_config_error() {
        clear_env();
        env::set_var("BACKEND_JWT_SECRET", "   ");
        let err = AppSettings::from_env().unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
        clear_env();
    }

    #[test]
    #[serial]
    fn defaults_apply_when_only_secret_is_set() {
        clear_env();
        env::set_var("BACKEND_JWT_SECRET", "a-real-secret");
        let settings = AppSettings::from_env().unwrap();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 3001);
        assert_eq!(
            settings.security_config().jwt_secret,
            b"a-real-secret".to_vec()
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn bad_port_is_a_config_error() {
        clear_env();
        env::set_var("BACKEND_JWT_SECRET", "a-real-secret");
        env::set_var("BACKEND_PORT", "not-a-port");
        let err = AppSettings::from_env().unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
        clear_env();
    }
}
