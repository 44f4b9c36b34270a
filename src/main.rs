use authcookie::{
    session::{self, cookie_key},
    AppState, SessionConfig, TokenError,
};
use axum::http::{header, Method};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authcookie=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting session cookie server");

    let config = SessionConfig::from_env()?;
    let cookie_secret = std::env::var("COOKIE_SECRET")
        .map_err(|_| TokenError::Configuration("COOKIE_SECRET is not set".to_string()))?;
    let app_state = AppState::new(&config, cookie_key(cookie_secret.as_bytes())?);

    // SameSite=None cookies are only sent cross-site with credentialed CORS
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let app = session::router(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
