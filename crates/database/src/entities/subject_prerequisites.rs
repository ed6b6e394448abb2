use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Prerequisite edge table: `subject_id` depends on `prerequisite_id`.
/// The graph must stay acyclic; every write re-runs the DFS check in the
/// curriculum service.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subject_prerequisites")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub subject_id: Uuid,
    pub prerequisite_id: Uuid,
    pub created_at: DateTime,
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
        belongs_to = "super::subjects::Entity",
        from = "Column::PrerequisiteId",
        to = "super::subjects::Column::Id"
    )]
    Prerequisite,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
