use axum::http::{header::ORIGIN, HeaderMap, Uri};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use serde::Serialize;
use tracing::{debug, instrument};

use super::config::{Environment, SessionConfig};
use super::errors::TokenError;
use super::token::TokenIssuer;

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE_NAME: &str = "token";

/// Issues a token and stores it in a signed `token` cookie
#[derive(Clone)]
pub struct CookieAttacher {
    issuer: TokenIssuer,
    environment: Environment,
}

impl CookieAttacher {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            issuer: TokenIssuer::new(config),
            environment: config.environment,
        }
    }

    /// Adds exactly one `token` cookie to `jar`. Return the jar from the handler
    /// so axum writes the `Set-Cookie` header.
    #[instrument(skip(self, jar, request_headers, token_user))]
    pub fn attach_token<P: Serialize>(
        &self,
        jar: SignedCookieJar,
        request_headers: &HeaderMap,
        token_user: &P,
    ) -> Result<SignedCookieJar, TokenError> {
        let token = self.issuer.issue(token_user)?;
        let expiration_millis = self.issuer.default_expiration_millis();

        let mut cookie = Cookie::build((TOKEN_COOKIE_NAME, token))
            .path("/")
            .http_only(true)
            .max_age(max_age(expiration_millis))
            .secure(!self.environment.is_development())
            .same_site(SameSite::None)
            .build();

        if let Some(domain) = origin_domain(request_headers) {
            cookie.set_domain(domain);
        }

        debug!(
            domain = ?cookie.domain(),
            secure = ?cookie.secure(),
            expiration_millis,
            "Attaching session token cookie"
        );

        Ok(jar.add(cookie))
    }
}

/// Builds the cookie-signing key; the secret must be at least 64 bytes
pub fn cookie_key(secret: &[u8]) -> Result<Key, TokenError> {
    Key::try_from(secret)
        .map_err(|e| TokenError::Configuration(format!("invalid cookie secret: {}", e)))
}

/// `Max-Age` is in whole seconds; the configured duration is in milliseconds
fn max_age(expiration_millis: u64) -> time::Duration {
    let seconds = i64::try_from(expiration_millis / 1000).unwrap_or(i64::MAX);
    time::Duration::seconds(seconds)
}

/// Host of the request's `Origin` header, if it has one
fn origin_domain(headers: &HeaderMap) -> Option<String> {
    let origin = headers.get(ORIGIN)?.to_str().ok()?;
    let uri: Uri = origin.parse().ok()?;
    uri.scheme()?;
    uri.host().map(str::to_string)
}
