use crate::dtos::enrollment::{
    CreateEnrollmentRequest, EnrollmentResponse, FinishEnrollmentRequest, HomologateRequest,
    ReactivateRequest,
};
use crate::error::ApiError;
use axum::Json;
use axum::extract::{Path, State};
use database::services::enrollment::{CreateEnrollment, EnrollmentService};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Assign a plan to a student
#[utoipa::path(
    post,
    path = "/enrollments",
    request_body = CreateEnrollmentRequest,
    responses(
        (status = 200, description = "Enrollment created and activated", body = EnrollmentResponse),
        (status = 404, description = "Student or plan not found"),
        (status = 409, description = "An active enrollment already exists for this plan")
    ),
    tag = "Enrollments"
)]
pub async fn create_enrollment(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateEnrollmentRequest>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let enrollment = EnrollmentService::create_enrollment(
        &db,
        CreateEnrollment {
            student_id: payload.student_id,
            plan_id: payload.plan_id,
            initial_subject_id: payload.initial_subject_id,
            actor: payload.actor,
        },
    )
    .await?;
    Ok(Json(enrollment.into()))
}

/// Advance the current pointer to the next subject in plan order
#[utoipa::path(
    post,
    path = "/enrollments/{id}/advance",
    params(("id" = Uuid, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Pointer advanced", body = EnrollmentResponse),
        (status = 400, description = "Plan completed, no next subject"),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Enrollments"
)]
pub async fn advance(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let enrollment = EnrollmentService::advance_to_next_subject(&db, id).await?;
    Ok(Json(enrollment.into()))
}

/// Suspend an active enrollment
#[utoipa::path(
    post,
    path = "/enrollments/{id}/suspend",
    params(("id" = Uuid, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Enrollment suspended", body = EnrollmentResponse),
        (status = 400, description = "Enrollment is not active"),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Enrollments"
)]
pub async fn suspend(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let enrollment = EnrollmentService::suspend(&db, id).await?;
    Ok(Json(enrollment.into()))
}

/// Reactivate a suspended enrollment
#[utoipa::path(
    post,
    path = "/enrollments/{id}/reactivate",
    params(("id" = Uuid, Path, description = "Enrollment id")),
    request_body = ReactivateRequest,
    responses(
        (status = 200, description = "Enrollment reactivated", body = EnrollmentResponse),
        (status = 403, description = "Student not financially current"),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Enrollments"
)]
pub async fn reactivate(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReactivateRequest>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let enrollment = EnrollmentService::reactivate(&db, id, payload.coordinator).await?;
    Ok(Json(enrollment.into()))
}

/// Complete an enrollment with a final grade
#[utoipa::path(
    post,
    path = "/enrollments/{id}/complete",
    params(("id" = Uuid, Path, description = "Enrollment id")),
    request_body = FinishEnrollmentRequest,
    responses(
        (status = 200, description = "Enrollment finished", body = EnrollmentResponse),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Enrollments"
)]
pub async fn complete(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FinishEnrollmentRequest>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let enrollment = EnrollmentService::complete(&db, id, payload.grade).await?;
    Ok(Json(enrollment.into()))
}

/// Fail an enrollment with a final grade
#[utoipa::path(
    post,
    path = "/enrollments/{id}/fail",
    params(("id" = Uuid, Path, description = "Enrollment id")),
    request_body = FinishEnrollmentRequest,
    responses(
        (status = 200, description = "Enrollment failed and closed", body = EnrollmentResponse),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Enrollments"
)]
pub async fn fail(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FinishEnrollmentRequest>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let enrollment = EnrollmentService::fail(&db, id, payload.grade).await?;
    Ok(Json(enrollment.into()))
}

/// Homologate an enrollment (requires a justification)
#[utoipa::path(
    post,
    path = "/enrollments/{id}/homologate",
    params(("id" = Uuid, Path, description = "Enrollment id")),
    request_body = HomologateRequest,
    responses(
        (status = 200, description = "Enrollment homologated", body = EnrollmentResponse),
        (status = 400, description = "Missing justification"),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Enrollments"
)]
pub async fn homologate(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Json(payload): Json<HomologateRequest>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let enrollment = EnrollmentService::homologate(&db, id, &payload.justification).await?;
    Ok(Json(enrollment.into()))
}
