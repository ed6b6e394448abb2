use crate::dtos::session::{
    CancelSessionRequest, CreateSessionRequest, RosterResponse, SessionResponse,
};
use crate::error::ApiError;
use axum::Json;
use axum::extract::{Path, State};
use database::services::booking::BookingService;
use database::services::session::{CreateSession, SessionService};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Schedule a session
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Session created", body = SessionResponse),
        (status = 400, description = "Invalid window, capacity or campus schedule"),
        (status = 409, description = "Teacher, coach or room double-booked")
    ),
    tag = "Sessions"
)]
pub async fn create_session(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = SessionService::create_session(
        &db,
        CreateSession {
            subject_id: payload.subject_id,
            elective_pool_id: payload.elective_pool_id,
            campus_id: payload.campus_id,
            room_id: payload.room_id,
            teacher_id: payload.teacher_id,
            coach_id: payload.coach_id,
            starts_at: payload.starts_at,
            ends_at: payload.ends_at,
            delivery_mode: payload.delivery_mode,
            max_capacity: payload.max_capacity,
            audience_unit_from: payload.audience_unit_from,
            audience_unit_to: payload.audience_unit_to,
        },
    )
    .await?;
    Ok(Json(session.into()))
}

/// Move a draft session to planned
#[utoipa::path(
    post,
    path = "/sessions/{id}/plan",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session planned", body = SessionResponse),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions"
)]
pub async fn plan(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = SessionService::plan(&db, id).await?;
    Ok(Json(session.into()))
}

/// Publish a planned session (re-validates the campus window)
#[utoipa::path(
    post,
    path = "/sessions/{id}/publish",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session published", body = SessionResponse),
        (status = 400, description = "Window no longer valid at the campus"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions"
)]
pub async fn publish(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = SessionService::publish(&db, id).await?;
    Ok(Json(session.into()))
}

/// Unpublish an active session
#[utoipa::path(
    post,
    path = "/sessions/{id}/unpublish",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session back to planned", body = SessionResponse),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions"
)]
pub async fn unpublish(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = SessionService::unpublish(&db, id).await?;
    Ok(Json(session.into()))
}

/// Coach starts the class
#[utoipa::path(
    post,
    path = "/sessions/{id}/start",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session in progress", body = SessionResponse),
        (status = 400, description = "Missing subject, room or staffing"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions"
)]
pub async fn start(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = SessionService::start(&db, id).await?;
    Ok(Json(session.into()))
}

/// Coach finishes the class; history rows are backfilled for the roster
#[utoipa::path(
    post,
    path = "/sessions/{id}/finish",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session done", body = SessionResponse),
        (status = 400, description = "Session is not in progress"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions"
)]
pub async fn finish(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = SessionService::finish(&db, id).await?;
    Ok(Json(session.into()))
}

/// Cancel a session (reachable from any non-done state, reason required)
#[utoipa::path(
    post,
    path = "/sessions/{id}/cancel",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = CancelSessionRequest,
    responses(
        (status = 200, description = "Session cancelled", body = SessionResponse),
        (status = 400, description = "Missing reason or session already done"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions"
)]
pub async fn cancel(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelSessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = SessionService::cancel(&db, id, &payload.reason).await?;
    Ok(Json(session.into()))
}

/// Roster counts for a session
#[utoipa::path(
    get,
    path = "/sessions/{id}/roster",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Roster counts", body = RosterResponse)
    ),
    tag = "Sessions"
)]
pub async fn roster(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<RosterResponse>, ApiError> {
    let roster = BookingService::roster(&db, id).await?;
    Ok(Json(RosterResponse::from_roster(id, roster)))
}
