use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "phases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub program_id: Uuid,
    pub code: String,
    pub name: String,
    pub sequence: i32,
    /// Courtesy/free-period phases re-expose the levels of another phase
    /// instead of owning their own.
    pub level_source_phase_id: Option<Uuid>,
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
    #[sea_orm(has_many = "super::levels::Entity")]
    Levels,
    #[sea_orm(has_many = "super::plan_phases::Entity")]
    PlanPhases,
}

impl Related<super::programs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Program.def()
    }
}

impl Related<super::levels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Levels.def()
    }
}

// Many-to-many relationship with plans
impl Related<super::plans::Entity> for Entity {
    fn to() -> RelationDef {
        super::plan_phases::Relation::Plan.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::plan_phases::Relation::Phase.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
