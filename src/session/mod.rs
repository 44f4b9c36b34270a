use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::shared::AppState;

// Public API - what other modules can use
pub use config::{Environment, SessionConfig, DEFAULT_EXPIRATION_MILLIS};
pub use cookie::{cookie_key, CookieAttacher, TOKEN_COOKIE_NAME};
pub use errors::TokenError;
pub use handlers::{create_session, current_user};
pub use middleware::cookie_auth;
pub use token::{TokenIssuer, TokenValidator};
pub use types::TokenUser;

// Internal modules
mod config;
mod cookie;
mod errors;
mod handlers;
mod middleware;
mod token;
mod types;

/// Session routes: `POST /session` issues the cookie, `GET /session/me` requires it
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/session", post(create_session))
        .route(
            "/session/me",
            get(current_user).route_layer(from_fn_with_state(state.clone(), cookie_auth)),
        )
        .with_state(state)
}
