use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Routes nested under `/admin`, exclusive to the 'admin' role. The route
/// guard restricts the whole `/admin(.*)` section by the static table; the
/// handlers additionally verify the role so each endpoint stands on its
/// own.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin
        // The admin landing page: aggregate student/teacher/parent/event
        // headcounts for the dashboard cards.
        .route("/", get(handlers::get_admin_dashboard))
}
