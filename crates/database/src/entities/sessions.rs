use models::states::{DeliveryMode, SessionState};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A scheduled class. Times are stored UTC and validated against the
/// campus's windows in campus-local time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub code: String,
    /// Fixed subject; absent for elective-pool sessions.
    pub subject_id: Option<Uuid>,
    pub elective_pool_id: Option<Uuid>,
    pub campus_id: Uuid,
    pub room_id: Option<Uuid>,
    /// Staffing lives outside the core; these are external references used
    /// only for conflict detection and reporting.
    pub teacher_id: Option<Uuid>,
    pub coach_id: Option<Uuid>,
    pub starts_at: DateTime,
    pub ends_at: DateTime,
    pub delivery_mode: DeliveryMode,
    pub max_capacity: i32,
    pub state: SessionState,
    pub published: bool,
    /// Inclusive unit range of the intended audience for pool sessions.
    pub audience_unit_from: Option<i32>,
    pub audience_unit_to: Option<i32>,
    pub cancellation_reason: Option<String>,
    pub inactive_flagged_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::elective_pools::Entity",
        from = "Column::ElectivePoolId",
        to = "super::elective_pools::Column::Id"
    )]
    ElectivePool,
    #[sea_orm(
        belongs_to = "super::campuses::Entity",
        from = "Column::CampusId",
        to = "super::campuses::Column::Id"
    )]
    Campus,
    #[sea_orm(
        belongs_to = "super::rooms::Entity",
        from = "Column::RoomId",
        to = "super::rooms::Column::Id"
    )]
    Room,
    #[sea_orm(has_many = "super::session_enrollments::Entity")]
    SessionEnrollments,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::elective_pools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ElectivePool.def()
    }
}

impl Related<super::campuses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campus.def()
    }
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl Related<super::session_enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionEnrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
