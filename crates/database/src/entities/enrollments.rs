use models::states::EnrollmentState;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A student's enrollment into a plan. Carries the "current pointer": the
/// (phase, level, subject) the student is meant to be working on.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub code: String,
    pub student_id: Uuid,
    pub plan_id: Uuid,
    pub state: EnrollmentState,
    pub current_phase_id: Option<Uuid>,
    pub current_level_id: Option<Uuid>,
    pub current_subject_id: Option<Uuid>,
    /// Set when a coordinator reactivated past a financial block.
    pub financial_override: bool,
    pub final_grade: Option<f32>,
    pub started_on: Option<Date>,
    pub finished_on: Option<Date>,
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
        belongs_to = "super::plans::Entity",
        from = "Column::PlanId",
        to = "super::plans::Column::Id"
    )]
    Plan,
    #[sea_orm(has_many = "super::enrollment_progress::Entity")]
    EnrollmentProgress,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl Related<super::enrollment_progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnrollmentProgress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
