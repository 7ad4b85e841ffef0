//! ExoneraTor web service
//!
//! Routes:
//! - `GET /`        search form and answers (`ip`, `timestamp`, `lang`)
//! - `GET /health`  liveness and version
//! - `GET /metrics` Prometheus counters
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod service;

pub use service::{answer, AppState, Page, ServiceError};

use axum::{routing::get, Router};

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::exonerator))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::catch_panic())
        .layer(middleware::trace())
}

pub async fn run(addr: &str, state: AppState) -> Result<(), ServiceError> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("ExoneraTor listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
