//! Civic API: REST surface over the report triage pipeline
//!
//! One router exposes the full flow: risk assessment, verification,
//! rewards, work-order drafting, and user balances, plus health and
//! Prometheus endpoints.

pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod state;

pub use metrics::ApiMetrics;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the router with all routes and middleware attached.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handlers::health))
        .route("/v1/assess", post(handlers::assess))
        .route("/v1/verify", post(handlers::verify))
        .route("/v1/reward", post(handlers::reward))
        .route("/v1/work-order", post(handlers::work_order))
        .route("/v1/users/{id}", get(handlers::user_balance))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors())
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn run(addr: &str, state: AppState) {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    tracing::info!("civic API listening on {}", addr);

    axum::serve(listener, app).await.expect("Server error");
}
