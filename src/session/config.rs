use tracing::debug;

use super::errors::TokenError;

/// Default token lifetime when `TOKEN_EXPIRATION_TIME` is unset (one day)
pub const DEFAULT_EXPIRATION_MILLIS: u64 = 24 * 60 * 60 * 1000;

/// Deployment mode; only development relaxes the cookie `Secure` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_mode(mode: &str) -> Self {
        if mode == "development" {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

/// Configuration shared by the token issuer, validator and cookie attacher
#[derive(Clone)]
pub struct SessionConfig {
    jwt_secret: String,
    pub expiration_millis: u64,
    pub environment: Environment,
}

impl SessionConfig {
    pub fn new(
        jwt_secret: impl Into<String>,
        expiration_millis: u64,
        environment: Environment,
    ) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            expiration_millis,
            environment,
        }
    }

    /// Reads `JWT_SECRET`, `TOKEN_EXPIRATION_TIME` and `APP_ENV` from the process environment
    pub fn from_env() -> Result<Self, TokenError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TokenError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| TokenError::Configuration("JWT_SECRET is not set".to_string()))?;

        let expiration_millis = match lookup("TOKEN_EXPIRATION_TIME") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                TokenError::Configuration(format!(
                    "TOKEN_EXPIRATION_TIME must be an integer number of milliseconds: {}",
                    e
                ))
            })?,
            None => DEFAULT_EXPIRATION_MILLIS,
        };

        let environment = lookup("APP_ENV")
            .map(|mode| Environment::from_mode(&mode))
            .unwrap_or(Environment::Production);

        debug!(
            expiration_millis,
            environment = ?environment,
            "Loaded session configuration"
        );

        Ok(Self::new(jwt_secret, expiration_millis, environment))
    }

    pub(crate) fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("jwt_secret", &"<redacted>")
            .field("expiration_millis", &self.expiration_millis)
            .field("environment", &self.environment)
            .finish()
    }
}
