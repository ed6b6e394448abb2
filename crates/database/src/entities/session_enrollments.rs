use models::states::{BookingOrigin, SessionEnrollmentState};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A (session, student) booking. Owned exclusively by the session
/// (cascade). At most one non-cancelled row per (session, student).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "session_enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub session_id: Uuid,
    pub student_id: Uuid,
    pub state: SessionEnrollmentState,
    pub origin: BookingOrigin,
    /// The concrete subject this booking counts for; resolved from the
    /// session's elective pool when one is configured.
    pub effective_subject_id: Option<Uuid>,
    pub effective_unit_number: Option<i32>,
    pub confirmed_at: Option<DateTime>,
    pub attendance_marked_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sessions::Entity",
        from = "Column::SessionId",
        to = "super::sessions::Column::Id"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::EffectiveSubjectId",
        to = "super::subjects::Column::Id"
    )]
    EffectiveSubject,
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EffectiveSubject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
