use crate::dtos::booking::{
    AttendanceRequest, BookSessionRequest, BookingResponse, CancelBookingRequest,
};
use crate::error::ApiError;
use axum::Json;
use axum::extract::{Path, State};
use database::db::with_conflict_retry;
use database::services::booking::{BookSession, BookingService};
use models::states::BookingOrigin;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Book a student into a session (full admission gate)
#[utoipa::path(
    post,
    path = "/sessions/{id}/bookings",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = BookSessionRequest,
    responses(
        (status = 200, description = "Booking created", body = BookingResponse),
        (status = 409, description = "Duplicate booking, session full or subject completed"),
        (status = 422, description = "Prerequisites unmet"),
        (status = 404, description = "Session or student not found")
    ),
    tag = "Bookings"
)]
pub async fn book(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookSessionRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    // Capacity races are caught by the in-transaction checks; losing a
    // serialization race retries the whole booking.
    let booking = with_conflict_retry(|| {
        BookingService::book(
            &db,
            BookSession {
                session_id: id,
                student_id: payload.student_id,
                origin: payload.origin.unwrap_or(BookingOrigin::Portal),
                actor_is_coordinator: payload.coordinator,
                override_reason: payload.override_reason.clone(),
            },
        )
    })
    .await?;
    Ok(Json(booking.into()))
}

/// Confirm a pending booking
#[utoipa::path(
    post,
    path = "/bookings/{id}/confirm",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking confirmed", body = BookingResponse),
        (status = 409, description = "Session full or subject already completed"),
        (status = 404, description = "Booking not found")
    ),
    tag = "Bookings"
)]
pub async fn confirm(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = with_conflict_retry(|| BookingService::confirm(&db, id)).await?;
    Ok(Json(booking.into()))
}

/// Mark a confirmed booking attended
#[utoipa::path(
    post,
    path = "/bookings/{id}/attended",
    params(("id" = Uuid, Path, description = "Booking id")),
    request_body = AttendanceRequest,
    responses(
        (status = 200, description = "Attendance recorded and synchronized"),
        (status = 400, description = "Booking not confirmed or session not running"),
        (status = 404, description = "Booking not found")
    ),
    tag = "Bookings"
)]
pub async fn mark_attended(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttendanceRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    BookingService::mark_attended(&db, id, payload.actor).await?;
    Ok(Json(serde_json::json!({ "status": "attended" })))
}

/// Mark a confirmed booking absent
#[utoipa::path(
    post,
    path = "/bookings/{id}/absent",
    params(("id" = Uuid, Path, description = "Booking id")),
    request_body = AttendanceRequest,
    responses(
        (status = 200, description = "Absence recorded and synchronized"),
        (status = 400, description = "Booking not confirmed or session not running"),
        (status = 404, description = "Booking not found")
    ),
    tag = "Bookings"
)]
pub async fn mark_absent(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttendanceRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    BookingService::mark_absent(&db, id, payload.actor).await?;
    Ok(Json(serde_json::json!({ "status": "absent" })))
}

/// Cancel a booking (advance-time policy applies to portal cancellations)
#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    params(("id" = Uuid, Path, description = "Booking id")),
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponse),
        (status = 400, description = "Too late to cancel or already attended"),
        (status = 404, description = "Booking not found")
    ),
    tag = "Bookings"
)]
pub async fn cancel(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = BookingService::cancel(&db, id, payload.by_staff).await?;
    Ok(Json(booking.into()))
}

/// Reopen a cancelled booking while seats remain
#[utoipa::path(
    post,
    path = "/bookings/{id}/reopen",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking back to pending", body = BookingResponse),
        (status = 409, description = "Session full"),
        (status = 404, description = "Booking not found")
    ),
    tag = "Bookings"
)]
pub async fn reopen(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = BookingService::reopen(&db, id).await?;
    Ok(Json(booking.into()))
}
