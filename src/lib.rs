use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod access;
pub mod auth;
pub mod config;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod related;
pub mod repository;

// Module for routing segregation (Public, Authenticated, Admin).
pub mod routes;
use access::RoutePolicy;
use auth::AuthUser; // The resolved authenticated user identity.
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the application entry point.
pub use config::AppConfig;
pub use identity::{HttpIdentityClient, IdentityState, MockIdentityService};
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the portal.
/// Aggregates every handler decorated with `#[utoipa::path]` and the
/// request/response schemas. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_session_profile, handlers::get_admin_dashboard,
        handlers::get_related_data,
        handlers::create_subject, handlers::update_subject, handlers::delete_subject,
        handlers::create_class, handlers::update_class, handlers::delete_class,
        handlers::create_teacher, handlers::update_teacher, handlers::delete_teacher,
        handlers::create_student, handlers::update_student, handlers::delete_student,
        handlers::create_parent, handlers::update_parent, handlers::delete_parent,
        handlers::create_lesson, handlers::update_lesson, handlers::delete_lesson,
        handlers::create_exam, handlers::update_exam, handlers::delete_exam,
        handlers::create_assignment, handlers::update_assignment, handlers::delete_assignment,
        handlers::create_result, handlers::update_result, handlers::delete_result,
        handlers::create_event, handlers::update_event, handlers::delete_event,
        handlers::create_announcement, handlers::update_announcement, handlers::delete_announcement,
    ),
    components(
        schemas(
            access::Role,
            models::MutationStatus, models::SessionProfile, models::DashboardStats,
            models::PersonOption, models::NamedOption, models::TitledOption,
            models::GradeOption, models::ClassRosterOption, models::LessonOption,
            models::LookupRecord,
            models::SubjectPayload, models::ClassPayload, models::TeacherPayload,
            models::StudentPayload, models::ParentPayload, models::LessonPayload,
            models::ExamPayload, models::AssignmentPayload, models::ResultPayload,
            models::EventPayload, models::AnnouncementPayload,
        )
    ),
    tags(
        (name = "school-portal", description = "School Management Portal API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all application
/// services and configuration, shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: abstracts database access via the PgPool.
    pub repo: RepositoryState,
    /// Identity Layer: the provider's user-management API.
    pub identity: IdentityState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
    /// The route-access table, built once at startup and never mutated.
    pub policy: Arc<RoutePolicy>,
}

// --- Axum FromRef Extractor Implementations ---

// Allow handlers and extractors to pull individual components from the
// shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for IdentityState {
    fn from_ref(app_state: &AppState) -> IdentityState {
        app_state.identity.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for Arc<RoutePolicy> {
    fn from_ref(app_state: &AppState) -> Arc<RoutePolicy> {
        app_state.policy.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the protected routes: extracting `AuthUser`
/// rejects the request with 401 before the handler runs if the session is
/// missing or invalid.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the application's routing structure, applies the route guard,
/// authentication and observability layers, and registers the state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes: no middleware applied.
        .merge(public::public_routes())
        // Authenticated routes: session required (401 otherwise).
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Admin routes: nested under '/admin'; the route guard restricts
        // the section and the handlers re-check the role.
        .nest(
            "/admin",
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        // Route guard: evaluates the static role table for every matched
        // route and redirects violating callers to their landing page.
        // Applied outside the auth layers so the redirect wins over a 401
        // for role mismatches.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            access::route_guard,
        ))
        // Apply the unified state to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: a unique UUID per request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: wraps the request/response lifecycle
                // in a span correlated by the request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer.
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes TraceLayer's span creation: includes the `x-request-id`
/// header (if present) alongside the method and URI so every log line for
/// one request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
