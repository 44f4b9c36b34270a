use axum::{
    extract::FromRef,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::Key;
use serde_json::json;
use thiserror::Error;

use crate::session::{CookieAttacher, SessionConfig, TokenError, TokenValidator};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub token_validator: TokenValidator,
    pub cookie_attacher: CookieAttacher,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(config: &SessionConfig, cookie_key: Key) -> Self {
        Self {
            token_validator: TokenValidator::new(config),
            cookie_attacher: CookieAttacher::new(config),
            cookie_key,
        }
    }
}

// Lets `SignedCookieJar` extract its signing key from the state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Token(e) if e.is_unauthenticated() => {
                (StatusCode::UNAUTHORIZED, e.to_string())
            }
            AppError::Token(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Token(TokenError::Expired), StatusCode::UNAUTHORIZED)]
    #[case(AppError::Token(TokenError::InvalidSignature), StatusCode::UNAUTHORIZED)]
    #[case(
        AppError::Token(TokenError::MalformedToken("bad".to_string())),
        StatusCode::UNAUTHORIZED
    )]
    #[case(
        AppError::Token(TokenError::Configuration("missing".to_string())),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[case(
        AppError::Token(TokenError::Serialization("bad".to_string())),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[case(AppError::Unauthorized("no cookie".to_string()), StatusCode::UNAUTHORIZED)]
    fn test_error_status_codes(#[case] error: AppError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }
}
