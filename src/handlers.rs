use crate::{
    AppState,
    access::Role,
    auth::AuthUser,
    identity::ProvisionUserRequest,
    models::{
        AnnouncementPayload, AssignmentPayload, ClassPayload, DashboardStats, EventPayload,
        ExamPayload, LessonPayload, MutationStatus, ParentPayload, RelatedData, ResultPayload,
        SessionProfile, StudentPayload, SubjectPayload, TeacherPayload,
    },
    related::{self, EntityKind},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// Folds a repository affected-rows boolean into the uniform status body.
fn status(ok: bool) -> Json<MutationStatus> {
    if ok {
        Json(MutationStatus::ok())
    } else {
        Json(MutationStatus::failed())
    }
}

/// Builds the identity-provider mirror request for a person payload.
fn provision(
    username: &str,
    password: &Option<String>,
    name: &str,
    surname: &str,
    role: Role,
) -> ProvisionUserRequest {
    ProvisionUserRequest {
        username: username.to_string(),
        // Empty string means "unchanged" in the form contract.
        password: password.clone().filter(|p| !p.is_empty()),
        first_name: name.to_string(),
        last_name: surname.to_string(),
        role,
    }
}

// --- Session & Dashboards ---

/// get_session_profile
///
/// [Authenticated Route] The landing endpoint for the teacher, student and
/// parent sections: echoes the caller's resolved session identity. The
/// route guard has already verified the section matches the caller's role.
#[utoipa::path(
    get,
    path = "/teacher",
    responses((
        status = 200,
        description = "Session profile. The same handler is mounted at /student and /parent; \
                       only /teacher is listed here to keep the OpenAPI entry single.",
        body = SessionProfile
    ))
)]
pub async fn get_session_profile(AuthUser { id, role }: AuthUser) -> Json<SessionProfile> {
    Json(SessionProfile { id, role })
}

/// get_admin_dashboard
///
/// [Admin Route] Aggregate headcounts for the admin landing page.
///
/// *RBAC*: The route guard already restricts `/admin(.*)` to admins; the
/// explicit role check keeps this endpoint safe on its own.
#[utoipa::path(
    get,
    path = "/admin",
    responses((status = 200, description = "Dashboard counts", body = DashboardStats))
)]
pub async fn get_admin_dashboard(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, StatusCode> {
    if role != Role::Admin {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.dashboard_stats().await))
}

// --- Related Data (form preparation) ---

/// get_related_data
///
/// [Authenticated Route] Returns the dependent-selector data for the given
/// entity's create/update form. Delete flows never call this endpoint.
///
/// Any failed lookup fails the whole response with a generic 500; there is
/// no partial related-data.
#[utoipa::path(
    get,
    path = "/forms/{entity}/related",
    params(("entity" = String, Path, description = "Entity kind the form targets")),
    responses(
        (status = 200, description = "Lookup name to selector rows"),
        (status = 500, description = "A lookup failed")
    )
)]
pub async fn get_related_data(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(entity): Path<EntityKind>,
) -> Result<Json<RelatedData>, StatusCode> {
    match related::assemble(state.repo.as_ref(), entity, auth.role, &auth.id).await {
        Ok(data) => Ok(Json(data)),
        Err(e) => {
            tracing::error!("related data assembly failed for {:?}: {:?}", entity, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// --- Subjects ---

/// create_subject
///
/// [Authenticated Route] Creates a subject with its teacher assignments.
#[utoipa::path(
    post,
    path = "/list/subjects",
    request_body = SubjectPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn create_subject(
    State(state): State<AppState>,
    Json(payload): Json<SubjectPayload>,
) -> Json<MutationStatus> {
    status(state.repo.create_subject(&payload).await)
}

/// update_subject
#[utoipa::path(
    put,
    path = "/list/subjects/{id}",
    request_body = SubjectPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SubjectPayload>,
) -> Json<MutationStatus> {
    status(state.repo.update_subject(id, &payload).await)
}

/// delete_subject
#[utoipa::path(
    delete,
    path = "/list/subjects/{id}",
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<MutationStatus> {
    status(state.repo.delete_subject(id).await)
}

// --- Classes ---

/// create_class
#[utoipa::path(
    post,
    path = "/list/classes",
    request_body = ClassPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn create_class(
    State(state): State<AppState>,
    Json(payload): Json<ClassPayload>,
) -> Json<MutationStatus> {
    status(state.repo.create_class(&payload).await)
}

/// update_class
#[utoipa::path(
    put,
    path = "/list/classes/{id}",
    request_body = ClassPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ClassPayload>,
) -> Json<MutationStatus> {
    status(state.repo.update_class(id, &payload).await)
}

/// delete_class
#[utoipa::path(
    delete,
    path = "/list/classes/{id}",
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<MutationStatus> {
    status(state.repo.delete_class(id).await)
}

// --- Teachers ---

/// create_teacher
///
/// [Authenticated Route] Provisions the account with the identity provider
/// first; the provider-assigned id becomes the teacher row's primary key.
/// A provider rejection is reported as the uniform failure status.
#[utoipa::path(
    post,
    path = "/list/teachers",
    request_body = TeacherPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn create_teacher(
    State(state): State<AppState>,
    Json(payload): Json<TeacherPayload>,
) -> Json<MutationStatus> {
    let req = provision(
        &payload.username,
        &payload.password,
        &payload.name,
        &payload.surname,
        Role::Teacher,
    );
    let id = match state.identity.create_user(&req).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("teacher provisioning failed: {e}");
            return Json(MutationStatus::failed());
        }
    };
    status(state.repo.create_teacher(&id, &payload).await)
}

/// update_teacher
///
/// Pushes the account changes to the identity provider, then updates the
/// mirrored row.
#[utoipa::path(
    put,
    path = "/list/teachers/{id}",
    request_body = TeacherPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<TeacherPayload>,
) -> Json<MutationStatus> {
    let req = provision(
        &payload.username,
        &payload.password,
        &payload.name,
        &payload.surname,
        Role::Teacher,
    );
    if let Err(e) = state.identity.update_user(&id, &req).await {
        tracing::error!("teacher account update failed: {e}");
        return Json(MutationStatus::failed());
    }
    status(state.repo.update_teacher(&id, &payload).await)
}

/// delete_teacher
///
/// Removes the provider account before the local row.
#[utoipa::path(
    delete,
    path = "/list/teachers/{id}",
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<MutationStatus> {
    if let Err(e) = state.identity.delete_user(&id).await {
        tracing::error!("teacher account delete failed: {e}");
        return Json(MutationStatus::failed());
    }
    status(state.repo.delete_teacher(&id).await)
}

// --- Students ---

/// create_student
///
/// Rejects the mutation when the target class is already at capacity, then
/// provisions the account and inserts the mirrored row.
#[utoipa::path(
    post,
    path = "/list/students",
    request_body = StudentPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn create_student(
    State(state): State<AppState>,
    Json(payload): Json<StudentPayload>,
) -> Json<MutationStatus> {
    match state.repo.class_headcount(payload.class_id).await {
        Some((capacity, enrolled)) if enrolled < capacity as i64 => {}
        // Unknown class or full class: uniform failure.
        _ => return Json(MutationStatus::failed()),
    }

    let req = provision(
        &payload.username,
        &payload.password,
        &payload.name,
        &payload.surname,
        Role::Student,
    );
    let id = match state.identity.create_user(&req).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("student provisioning failed: {e}");
            return Json(MutationStatus::failed());
        }
    };
    status(state.repo.create_student(&id, &payload).await)
}

/// update_student
#[utoipa::path(
    put,
    path = "/list/students/{id}",
    request_body = StudentPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StudentPayload>,
) -> Json<MutationStatus> {
    let req = provision(
        &payload.username,
        &payload.password,
        &payload.name,
        &payload.surname,
        Role::Student,
    );
    if let Err(e) = state.identity.update_user(&id, &req).await {
        tracing::error!("student account update failed: {e}");
        return Json(MutationStatus::failed());
    }
    status(state.repo.update_student(&id, &payload).await)
}

/// delete_student
#[utoipa::path(
    delete,
    path = "/list/students/{id}",
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<MutationStatus> {
    if let Err(e) = state.identity.delete_user(&id).await {
        tracing::error!("student account delete failed: {e}");
        return Json(MutationStatus::failed());
    }
    status(state.repo.delete_student(&id).await)
}

// --- Parents ---

/// create_parent
#[utoipa::path(
    post,
    path = "/list/parents",
    request_body = ParentPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn create_parent(
    State(state): State<AppState>,
    Json(payload): Json<ParentPayload>,
) -> Json<MutationStatus> {
    let req = provision(
        &payload.username,
        &payload.password,
        &payload.name,
        &payload.surname,
        Role::Parent,
    );
    let id = match state.identity.create_user(&req).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("parent provisioning failed: {e}");
            return Json(MutationStatus::failed());
        }
    };
    status(state.repo.create_parent(&id, &payload).await)
}

/// update_parent
#[utoipa::path(
    put,
    path = "/list/parents/{id}",
    request_body = ParentPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn update_parent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ParentPayload>,
) -> Json<MutationStatus> {
    let req = provision(
        &payload.username,
        &payload.password,
        &payload.name,
        &payload.surname,
        Role::Parent,
    );
    if let Err(e) = state.identity.update_user(&id, &req).await {
        tracing::error!("parent account update failed: {e}");
        return Json(MutationStatus::failed());
    }
    status(state.repo.update_parent(&id, &payload).await)
}

/// delete_parent
#[utoipa::path(
    delete,
    path = "/list/parents/{id}",
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn delete_parent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<MutationStatus> {
    if let Err(e) = state.identity.delete_user(&id).await {
        tracing::error!("parent account delete failed: {e}");
        return Json(MutationStatus::failed());
    }
    status(state.repo.delete_parent(&id).await)
}

// --- Lessons ---

/// create_lesson
#[utoipa::path(
    post,
    path = "/list/lessons",
    request_body = LessonPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn create_lesson(
    State(state): State<AppState>,
    Json(payload): Json<LessonPayload>,
) -> Json<MutationStatus> {
    status(state.repo.create_lesson(&payload).await)
}

/// update_lesson
#[utoipa::path(
    put,
    path = "/list/lessons/{id}",
    request_body = LessonPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn update_lesson(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<LessonPayload>,
) -> Json<MutationStatus> {
    status(state.repo.update_lesson(id, &payload).await)
}

/// delete_lesson
#[utoipa::path(
    delete,
    path = "/list/lessons/{id}",
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn delete_lesson(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<MutationStatus> {
    status(state.repo.delete_lesson(id).await)
}

// --- Exams ---

/// create_exam
///
/// *Ownership*: A teacher may only attach an exam to a lesson they own;
/// other roles are unrestricted.
#[utoipa::path(
    post,
    path = "/list/exams",
    request_body = ExamPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn create_exam(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ExamPayload>,
) -> Json<MutationStatus> {
    if role == Role::Teacher && !state.repo.lesson_owned_by(payload.lesson_id, &id).await {
        return Json(MutationStatus::failed());
    }
    status(state.repo.create_exam(&payload).await)
}

/// update_exam
///
/// Same ownership rule as `create_exam`.
#[utoipa::path(
    put,
    path = "/list/exams/{id}",
    request_body = ExamPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn update_exam(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ExamPayload>,
) -> Json<MutationStatus> {
    if role == Role::Teacher && !state.repo.lesson_owned_by(payload.lesson_id, &user_id).await {
        return Json(MutationStatus::failed());
    }
    status(state.repo.update_exam(id, &payload).await)
}

/// delete_exam
#[utoipa::path(
    delete,
    path = "/list/exams/{id}",
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn delete_exam(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<MutationStatus> {
    status(state.repo.delete_exam(id).await)
}

// --- Assignments ---

/// create_assignment
///
/// *Ownership*: A teacher may only attach an assignment to a lesson they
/// own.
#[utoipa::path(
    post,
    path = "/list/assignments",
    request_body = AssignmentPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn create_assignment(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<AssignmentPayload>,
) -> Json<MutationStatus> {
    if role == Role::Teacher && !state.repo.lesson_owned_by(payload.lesson_id, &id).await {
        return Json(MutationStatus::failed());
    }
    status(state.repo.create_assignment(&payload).await)
}

/// update_assignment
#[utoipa::path(
    put,
    path = "/list/assignments/{id}",
    request_body = AssignmentPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn update_assignment(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AssignmentPayload>,
) -> Json<MutationStatus> {
    if role == Role::Teacher && !state.repo.lesson_owned_by(payload.lesson_id, &user_id).await {
        return Json(MutationStatus::failed());
    }
    status(state.repo.update_assignment(id, &payload).await)
}

/// delete_assignment
///
/// *Ownership*: A teacher may only delete assignments belonging to their
/// own lessons.
#[utoipa::path(
    delete,
    path = "/list/assignments/{id}",
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn delete_assignment(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<MutationStatus> {
    if role == Role::Teacher && !state.repo.assignment_owned_by(id, &user_id).await {
        return Json(MutationStatus::failed());
    }
    status(state.repo.delete_assignment(id).await)
}

// --- Results ---

/// create_result
#[utoipa::path(
    post,
    path = "/list/results",
    request_body = ResultPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn create_result(
    State(state): State<AppState>,
    Json(payload): Json<ResultPayload>,
) -> Json<MutationStatus> {
    status(state.repo.create_result(&payload).await)
}

/// update_result
#[utoipa::path(
    put,
    path = "/list/results/{id}",
    request_body = ResultPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn update_result(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ResultPayload>,
) -> Json<MutationStatus> {
    status(state.repo.update_result(id, &payload).await)
}

/// delete_result
#[utoipa::path(
    delete,
    path = "/list/results/{id}",
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn delete_result(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<MutationStatus> {
    status(state.repo.delete_result(id).await)
}

// --- Events ---

/// create_event
#[utoipa::path(
    post,
    path = "/list/events",
    request_body = EventPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<EventPayload>,
) -> Json<MutationStatus> {
    status(state.repo.create_event(&payload).await)
}

/// update_event
#[utoipa::path(
    put,
    path = "/list/events/{id}",
    request_body = EventPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<EventPayload>,
) -> Json<MutationStatus> {
    status(state.repo.update_event(id, &payload).await)
}

/// delete_event
#[utoipa::path(
    delete,
    path = "/list/events/{id}",
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<MutationStatus> {
    status(state.repo.delete_event(id).await)
}

// --- Announcements ---

/// create_announcement
#[utoipa::path(
    post,
    path = "/list/announcements",
    request_body = AnnouncementPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn create_announcement(
    State(state): State<AppState>,
    Json(payload): Json<AnnouncementPayload>,
) -> Json<MutationStatus> {
    status(state.repo.create_announcement(&payload).await)
}

/// update_announcement
#[utoipa::path(
    put,
    path = "/list/announcements/{id}",
    request_body = AnnouncementPayload,
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn update_announcement(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AnnouncementPayload>,
) -> Json<MutationStatus> {
    status(state.repo.update_announcement(id, &payload).await)
}

/// delete_announcement
#[utoipa::path(
    delete,
    path = "/list/announcements/{id}",
    responses((status = 200, description = "Mutation status", body = MutationStatus))
)]
pub async fn delete_announcement(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<MutationStatus> {
    status(state.repo.delete_announcement(id).await)
}
