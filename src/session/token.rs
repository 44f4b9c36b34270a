use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::config::SessionConfig;
use super::errors::TokenError;

/// Registered claims owned by the issuer; payloads may not carry them
const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

const ALGORITHM: Algorithm = Algorithm::HS256;

fn require_secret(secret: &str) -> Result<(), TokenError> {
    if secret.is_empty() {
        return Err(TokenError::Configuration(
            "JWT secret is empty".to_string(),
        ));
    }
    Ok(())
}

/// Signs payloads into compact JWTs carrying `iat` and `exp`
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    default_expiration_millis: u64,
}

impl TokenIssuer {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            secret: config.jwt_secret().to_string(),
            default_expiration_millis: config.expiration_millis,
        }
    }

    pub fn default_expiration_millis(&self) -> u64 {
        self.default_expiration_millis
    }

    /// Issues a token that expires after the configured default duration
    pub fn issue<P: Serialize>(&self, payload: &P) -> Result<String, TokenError> {
        self.issue_with_expiration(payload, self.default_expiration_millis)
    }

    /// Issues a token that expires `expiration_millis` from now
    #[instrument(skip(self, payload))]
    pub fn issue_with_expiration<P: Serialize>(
        &self,
        payload: &P,
        expiration_millis: u64,
    ) -> Result<String, TokenError> {
        require_secret(&self.secret)?;

        let mut claims = match serde_json::to_value(payload) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(TokenError::Serialization(format!(
                    "payload must serialize to a JSON object, got {}",
                    json_kind(&other)
                )))
            }
            Err(e) => return Err(TokenError::Serialization(e.to_string())),
        };

        if let Some(reserved) = RESERVED_CLAIMS.iter().find(|c| claims.contains_key(**c)) {
            return Err(TokenError::Serialization(format!(
                "payload already has a \"{}\" property",
                reserved
            )));
        }

        let now_millis = Utc::now().timestamp_millis().max(0) as u64;
        let iat = now_millis / 1000;
        let exp = now_millis.saturating_add(expiration_millis) / 1000;
        claims.insert("iat".to_string(), Value::from(iat));
        claims.insert("exp".to_string(), Value::from(exp));

        debug!(
            expiration_millis,
            iat_timestamp = iat,
            exp_timestamp = exp,
            "Signing JWT token"
        );

        encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            TokenError::Serialization(e.to_string())
        })
    }
}

/// Verifies tokens produced by [`TokenIssuer`] and recovers their payload
#[derive(Clone)]
pub struct TokenValidator {
    secret: String,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(config: &SessionConfig) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // `exp` is in whole seconds; a token is expired once `exp <= now`
        validation.leeway = 0;
        validation.reject_tokens_expiring_in_less_than = 1;

        Self {
            secret: config.jwt_secret().to_string(),
            validation,
        }
    }

    /// Checks signature and expiry, returning the payload without `iat`/`exp`
    #[instrument(skip(self, token))]
    pub fn validate<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        require_secret(&self.secret)?;

        let data = decode::<Map<String, Value>>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &self.validation,
        )
        .map_err(|e| {
            let error = TokenError::from_decode(e);
            warn!(error = %error, "JWT token rejected");
            error
        })?;

        let mut claims = data.claims;
        for reserved in RESERVED_CLAIMS {
            claims.remove(reserved);
        }

        serde_json::from_value(Value::Object(claims)).map_err(|e| {
            warn!(error = %e, "JWT payload does not match the expected shape");
            TokenError::MalformedToken(e.to_string())
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
