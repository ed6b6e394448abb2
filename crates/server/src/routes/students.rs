use crate::dtos::progress::ProgressRowResponse;
use crate::dtos::session::SessionResponse;
use crate::dtos::student::{
    CreateStudentRequest, MaxUnitResponse, StudentResponse, TransitionStudentRequest,
};
use crate::error::ApiError;
use axum::Json;
use axum::extract::{Path, State};
use database::error::AcademyError;
use database::services::booking::BookingService;
use database::services::enrollment::EnrollmentService;
use database::services::progression::ProgressionService;
use database::services::student::{CreateStudent, StudentService, TransitionStudent};
use models::states::TransitionOrigin;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Register a student
#[utoipa::path(
    post,
    path = "/students",
    request_body = CreateStudentRequest,
    responses(
        (status = 200, description = "Student created", body = StudentResponse),
        (status = 400, description = "Invalid identity, email or age")
    ),
    tag = "Students"
)]
pub async fn create_student(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = StudentService::create_student(
        &db,
        CreateStudent {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            birth_date: payload.birth_date,
            phone: payload.phone,
            financially_current: payload.financially_current.unwrap_or(true),
        },
    )
    .await?;
    Ok(Json(student.into()))
}

/// Apply a lifecycle transition to a student
#[utoipa::path(
    post,
    path = "/students/{id}/transitions",
    params(("id" = Uuid, Path, description = "Student id")),
    request_body = TransitionStudentRequest,
    responses(
        (status = 200, description = "Transition applied", body = StudentResponse),
        (status = 400, description = "Transition not allowed or reason missing"),
        (status = 404, description = "Student not found")
    ),
    tag = "Students"
)]
pub async fn transition_student(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionStudentRequest>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = StudentService::transition(
        &db,
        TransitionStudent {
            student_id: id,
            to: payload.to,
            reason: payload.reason,
            origin: payload.origin.unwrap_or(TransitionOrigin::Manual),
            actor: payload.actor,
        },
    )
    .await?;
    Ok(Json(student.into()))
}

/// A student's max completed unit
#[utoipa::path(
    get,
    path = "/students/{id}/max-unit",
    params(("id" = Uuid, Path, description = "Student id")),
    responses(
        (status = 200, description = "Max completed unit", body = MaxUnitResponse),
        (status = 404, description = "Student not found")
    ),
    tag = "Students"
)]
pub async fn max_unit(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<MaxUnitResponse>, ApiError> {
    let max_completed_unit = ProgressionService::max_completed_unit(&db, id).await?;
    Ok(Json(MaxUnitResponse {
        student_id: id,
        max_completed_unit,
    }))
}

/// A student's progress table (subjects x state) on their active enrollment
#[utoipa::path(
    get,
    path = "/students/{id}/progress",
    params(("id" = Uuid, Path, description = "Student id")),
    responses(
        (status = 200, description = "Progress rows", body = [ProgressRowResponse]),
        (status = 404, description = "Student or active enrollment not found")
    ),
    tag = "Students"
)]
pub async fn progress(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ProgressRowResponse>>, ApiError> {
    let enrollment = EnrollmentService::active_enrollment_for_student(&db, id)
        .await?
        .ok_or(AcademyError::NotFound("active enrollment"))?;
    let rows = ProgressionService::progress_table(&db, enrollment.id).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(subject, progress)| ProgressRowResponse::from_pair(subject, progress))
            .collect(),
    ))
}

/// Published future sessions the student passes the admission gate for
#[utoipa::path(
    get,
    path = "/students/{id}/bookable-sessions",
    params(("id" = Uuid, Path, description = "Student id")),
    responses(
        (status = 200, description = "Bookable sessions", body = [SessionResponse]),
        (status = 404, description = "Student not found")
    ),
    tag = "Students"
)]
pub async fn bookable_sessions(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SessionResponse>>, ApiError> {
    let sessions = BookingService::bookable_sessions(&db, id).await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}
