use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use medichat::config::AppConfig;
use medichat::handlers;
use medichat::services::backend::http::HttpBackend;
use medichat::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    tracing::info!(backend_url = %config.backend_url, "using assistant backend");

    let state = Arc::new(AppState {
        sessions: Mutex::new(HashMap::new()),
        config: config.clone(),
        backend: Box::new(HttpBackend::new(config.backend_url.clone())),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/chat/:patient_id/message",
            post(handlers::chat::send_message),
        )
        .route(
            "/api/chat/:patient_id/confirm",
            post(handlers::chat::confirm_booking),
        )
        .route(
            "/api/chat/:patient_id/pay",
            post(handlers::chat::process_payment),
        )
        .route(
            "/api/chat/:patient_id/cancel",
            post(handlers::chat::cancel_booking),
        )
        .route(
            "/api/chat/:patient_id/history",
            get(handlers::chat::get_history),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
