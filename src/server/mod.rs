//! HTTP surface: dua generation, Q&A, diagnostics and the curated catalog.

pub mod routes;
pub mod state;

pub use state::AppState;

use anyhow::{Context, Result};
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;

#[derive(Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn version_handler() -> Json<VersionInfo> {
    Json(VersionInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate-dua", post(routes::generate_dua))
        .route("/api/ask", post(routes::ask))
        .route("/api/test-gemini", get(routes::test_gemini))
        .route("/api/duas", get(routes::list_duas))
        .route("/api/duas/:id", get(routes::get_dua))
        .route("/api/daily-dua", get(routes::daily_dua))
        .route("/api/related-duas", get(routes::related_duas))
        .route("/health", get(health_handler))
        .route("/api/version", get(version_handler))
        .with_state(state)
}

/// Empty list = any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers([CONTENT_TYPE, ACCEPT]);
    if origins.is_empty() {
        return cors.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                log::warn!("ignoring invalid CORS origin {o:?}");
                None
            }
        })
        .collect();
    cors.allow_origin(allowed)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for Ctrl-C: {e}");
        return;
    }
    log::info!("Shutdown signal received, stopping server...");
}

pub async fn run_server(cfg: &Config, state: AppState) -> Result<()> {
    let app = router(state).layer(cors_layer(&cfg.cors_origins));

    let addr: SocketAddr = format!("{}:{}", cfg.bind, cfg.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", cfg.bind, cfg.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    log::info!("Server listening on http://{}", addr);
    if cfg.cors_origins.is_empty() {
        log::info!("CORS: any origin");
    } else {
        log::info!("CORS: {}", cfg.cors_origins.join(", "));
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}
