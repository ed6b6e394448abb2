use models::states::ProgressMode;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub program_id: Uuid,
    pub code: String,
    pub name: String,
    pub version: String,
    pub valid_from: Option<Date>,
    pub valid_until: Option<Date>,
    pub is_current: bool,
    pub progress_mode: ProgressMode,
    pub total_hours: i32,
    /// Courtesy plans share levels with a regular plan and auto-cancel
    /// their enrollments on prolonged inactivity.
    pub is_courtesy: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::programs::Entity",
        from = "Column::ProgramId",
        to = "super::programs::Column::Id"
    )]
    Program,
    #[sea_orm(has_many = "super::plan_phases::Entity")]
    PlanPhases,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
}

impl Related<super::programs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Program.def()
    }
}

impl Related<super::plan_phases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanPhases.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

// Many-to-many relationship with phases
impl Related<super::phases::Entity> for Entity {
    fn to() -> RelationDef {
        super::plan_phases::Relation::Phase.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::plan_phases::Relation::Plan.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
