use crate::AppState;
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints accessible to any client. Everything else in the application
/// sits behind the authentication layer and the route guard, so the public
/// surface is intentionally a single probe.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated monitoring/load-balancer probe. Returns "ok"
        // immediately to verify the service is responsive.
        .route("/health", get(|| async { "ok" }))
}
