use models::states::{AttendanceStatus, DeliveryMode};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Authoritative per-(student, session) attendance and grade record. The
/// curriculum context is denormalized for retrospective reporting, so the
/// row survives session deletion (session reference is set-null).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "academic_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub session_id: Option<Uuid>,
    pub subject_id: Uuid,
    pub program_id: Option<Uuid>,
    pub plan_id: Option<Uuid>,
    pub phase_id: Option<Uuid>,
    pub level_id: Option<Uuid>,
    pub campus_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub delivery_mode: Option<DeliveryMode>,
    pub session_starts_at: Option<DateTime>,
    pub attendance_status: AttendanceStatus,
    /// Must equal `attendance_status == attended` at all times.
    pub attended: bool,
    pub grade: Option<f32>,
    pub notes: Option<String>,
    pub attendance_marked_at: Option<DateTime>,
    pub grade_marked_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::sessions::Entity",
        from = "Column::SessionId",
        to = "super::sessions::Column::Id"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
