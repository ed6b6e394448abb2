use chrono::NaiveDateTime;
use database::entities::sessions;
use database::services::booking::SessionRoster;
use models::states::DeliveryMode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    pub subject_id: Option<Uuid>,
    pub elective_pool_id: Option<Uuid>,
    pub campus_id: Uuid,
    pub room_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub coach_id: Option<Uuid>,
    /// UTC
    pub starts_at: NaiveDateTime,
    /// UTC
    pub ends_at: NaiveDateTime,
    #[schema(value_type = String, example = "in_person")]
    pub delivery_mode: DeliveryMode,
    pub max_capacity: i32,
    pub audience_unit_from: Option<i32>,
    pub audience_unit_to: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelSessionRequest {
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub code: String,
    pub subject_id: Option<Uuid>,
    pub elective_pool_id: Option<Uuid>,
    pub campus_id: Uuid,
    pub room_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub coach_id: Option<Uuid>,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub delivery_mode: String,
    pub max_capacity: i32,
    pub state: String,
    pub published: bool,
    pub audience_unit_from: Option<i32>,
    pub audience_unit_to: Option<i32>,
    pub cancellation_reason: Option<String>,
}

impl From<sessions::Model> for SessionResponse {
    fn from(session: sessions::Model) -> Self {
        Self {
            id: session.id,
            code: session.code,
            subject_id: session.subject_id,
            elective_pool_id: session.elective_pool_id,
            campus_id: session.campus_id,
            room_id: session.room_id,
            teacher_id: session.teacher_id,
            coach_id: session.coach_id,
            starts_at: session.starts_at,
            ends_at: session.ends_at,
            delivery_mode: session.delivery_mode.to_string(),
            max_capacity: session.max_capacity,
            state: session.state.to_string(),
            published: session.published,
            audience_unit_from: session.audience_unit_from,
            audience_unit_to: session.audience_unit_to,
            cancellation_reason: session.cancellation_reason,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RosterResponse {
    pub session_id: Uuid,
    pub pending: u64,
    pub confirmed: u64,
    pub attended: u64,
    pub absent: u64,
    pub cancelled: u64,
}

impl RosterResponse {
    pub fn from_roster(session_id: Uuid, roster: SessionRoster) -> Self {
        Self {
            session_id,
            pending: roster.pending,
            confirmed: roster.confirmed,
            attended: roster.attended,
            absent: roster.absent,
            cancelled: roster.cancelled,
        }
    }
}
