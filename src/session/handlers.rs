use axum::{extract::State, http::HeaderMap, Extension, Json};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{info, instrument};

use super::types::TokenUser;
use crate::shared::{AppError, AppState};

/// HTTP handler for starting a session
///
/// POST /session
/// Sets the signed `token` cookie and echoes the user
#[instrument(name = "create_session", skip(state, jar, headers, user))]
pub async fn create_session(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    headers: HeaderMap,
    Json(user): Json<TokenUser>,
) -> Result<(SignedCookieJar, Json<TokenUser>), AppError> {
    info!(user_id = %user.id, "Creating session cookie");

    let jar = state.cookie_attacher.attach_token(jar, &headers, &user)?;

    Ok((jar, Json(user)))
}

/// GET /session/me
pub async fn current_user(Extension(user): Extension<TokenUser>) -> Json<TokenUser> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{router, Environment, TOKEN_COOKIE_NAME};
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use axum_extra::extract::cookie::Cookie;
    use tower::ServiceExt; // for `oneshot`

    fn login_request(origin: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/session")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(origin) = origin {
            builder = builder.header(header::ORIGIN, origin);
        }
        builder
            .body(Body::from(r#"{"id":"u1","role":"admin"}"#))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_session_handler() {
        let app = router(AppStateBuilder::new().build());

        let response = app
            .oneshot(login_request(Some("https://app.example.com")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let set_cookies: Vec<_> = response.headers().get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(set_cookies.len(), 1);

        let cookie = Cookie::parse(set_cookies[0].to_str().unwrap().to_string()).unwrap();
        assert_eq!(cookie.name(), TOKEN_COOKIE_NAME);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.domain(), Some("app.example.com"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let user: TokenUser = serde_json::from_slice(&body).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.role, "admin");
    }

    #[tokio::test]
    async fn test_development_cookie_is_not_secure() {
        let app = router(
            AppStateBuilder::new()
                .with_environment(Environment::Development)
                .build(),
        );

        let response = app.oneshot(login_request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let raw = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        let cookie = Cookie::parse(raw).unwrap();
        assert_eq!(cookie.secure(), None);
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[tokio::test]
    async fn test_current_user_requires_cookie() {
        let app = router(AppStateBuilder::new().build());

        let request = Request::builder()
            .uri("/session/me")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
