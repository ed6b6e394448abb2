use models::states::{StudentState, TransitionOrigin};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only log of student lifecycle transitions. If this write fails,
/// the transition that triggered it fails too.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lifecycle_histories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub state_from: StudentState,
    pub state_to: StudentState,
    pub reason: Option<String>,
    pub origin: TransitionOrigin,
    pub actor: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
