use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use thiserror::Error;

/// Failures raised while issuing or validating session tokens
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Malformed token: {0}")]
    MalformedToken(String),
}

impl TokenError {
    /// True for the failures a caller must answer with "unauthenticated"
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            TokenError::InvalidSignature | TokenError::Expired | TokenError::MalformedToken(_)
        )
    }

    /// Maps a `jsonwebtoken` decode failure onto the validation taxonomy
    pub(crate) fn from_decode(error: JwtError) -> Self {
        match error.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::MalformedToken(error.to_string()),
        }
    }
}
