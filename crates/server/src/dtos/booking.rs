use database::entities::session_enrollments;
use models::states::BookingOrigin;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct BookSessionRequest {
    pub student_id: Uuid,
    #[schema(value_type = Option<String>, example = "portal")]
    pub origin: Option<BookingOrigin>,
    /// Coordinators may book past an unmet prerequisite gate with a reason.
    #[serde(default)]
    pub coordinator: bool,
    pub override_reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelBookingRequest {
    #[serde(default)]
    pub by_staff: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceRequest {
    pub actor: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub student_id: Uuid,
    pub state: String,
    pub origin: String,
    pub effective_subject_id: Option<Uuid>,
    pub effective_unit_number: Option<i32>,
}

impl From<session_enrollments::Model> for BookingResponse {
    fn from(booking: session_enrollments::Model) -> Self {
        Self {
            id: booking.id,
            session_id: booking.session_id,
            student_id: booking.student_id,
            state: booking.state.to_string(),
            origin: booking.origin.to_string(),
            effective_subject_id: booking.effective_subject_id,
            effective_unit_number: booking.effective_unit_number,
        }
    }
}
