use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{info, instrument, warn};

use super::{cookie::TOKEN_COOKIE_NAME, types::TokenUser};
use crate::shared::{AppError, AppState};

/// Cookie authentication middleware - validates the signed `token` cookie and adds TokenUser to request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), session::cookie_auth))
/// Handlers can then extract Extension(user): Extension<TokenUser>.
#[instrument(skip(state, jar, req, next))]
pub async fn cookie_auth(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // `get` only yields cookies whose jar signature verifies
    let cookie = jar.get(TOKEN_COOKIE_NAME).ok_or_else(|| {
        warn!(uri = %req.uri(), "Missing or unsigned token cookie");
        AppError::Unauthorized("Missing session cookie".to_string())
    })?;

    let user: TokenUser = match state.token_validator.validate(cookie.value()) {
        Ok(user) => user,
        Err(e) => {
            warn!("Cookie authentication failed: {}", e);
            return Err(e.into());
        }
    };

    info!(user_id = %user.id, role = %user.role, "Authentication successful");

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
