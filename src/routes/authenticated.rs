use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// All form-preparation, mutation and landing endpoints. Every handler here
/// relies on the `AuthUser` extractor layer above this module, and the
/// route guard has already applied the static role table to the request
/// path (e.g. only admins reach `/list/subjects`).
///
/// Mutation endpoints follow one shape per entity:
///   POST   /list/{plural}       create
///   PUT    /list/{plural}/{id}  update
///   DELETE /list/{plural}/{id}  delete
/// and all three return the uniform success/error status body.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // --- Role landing pages ---
        // The route guard keeps each section private to its role.
        .route("/teacher", get(handlers::get_session_profile))
        .route("/student", get(handlers::get_session_profile))
        .route("/parent", get(handlers::get_session_profile))
        // --- Form preparation ---
        // GET /forms/{entity}/related
        // Dependent-selector data for the entity's create/update form.
        // Kinds without related data return an empty mapping.
        .route("/forms/{entity}/related", get(handlers::get_related_data))
        // --- Entity mutations ---
        .route("/list/subjects", post(handlers::create_subject))
        .route(
            "/list/subjects/{id}",
            put(handlers::update_subject).delete(handlers::delete_subject),
        )
        .route("/list/classes", post(handlers::create_class))
        .route(
            "/list/classes/{id}",
            put(handlers::update_class).delete(handlers::delete_class),
        )
        // Teacher/student/parent mutations also mirror the account to the
        // identity provider; their row ids are provider-assigned strings.
        .route("/list/teachers", post(handlers::create_teacher))
        .route(
            "/list/teachers/{id}",
            put(handlers::update_teacher).delete(handlers::delete_teacher),
        )
        .route("/list/students", post(handlers::create_student))
        .route(
            "/list/students/{id}",
            put(handlers::update_student).delete(handlers::delete_student),
        )
        .route("/list/parents", post(handlers::create_parent))
        .route(
            "/list/parents/{id}",
            put(handlers::update_parent).delete(handlers::delete_parent),
        )
        .route("/list/lessons", post(handlers::create_lesson))
        .route(
            "/list/lessons/{id}",
            put(handlers::update_lesson).delete(handlers::delete_lesson),
        )
        // Exams and assignments enforce lesson ownership for teachers
        // inside the handlers.
        .route("/list/exams", post(handlers::create_exam))
        .route(
            "/list/exams/{id}",
            put(handlers::update_exam).delete(handlers::delete_exam),
        )
        .route("/list/assignments", post(handlers::create_assignment))
        .route(
            "/list/assignments/{id}",
            put(handlers::update_assignment).delete(handlers::delete_assignment),
        )
        .route("/list/results", post(handlers::create_result))
        .route(
            "/list/results/{id}",
            put(handlers::update_result).delete(handlers::delete_result),
        )
        .route("/list/events", post(handlers::create_event))
        .route(
            "/list/events/{id}",
            put(handlers::update_event).delete(handlers::delete_event),
        )
        .route("/list/announcements", post(handlers::create_announcement))
        .route(
            "/list/announcements/{id}",
            put(handlers::update_announcement).delete(handlers::delete_announcement),
        )
}
