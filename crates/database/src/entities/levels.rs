use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "levels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub phase_id: Uuid,
    pub code: String,
    pub name: String,
    pub sequence: i32,
    /// Highest curriculum unit this level terminates at (e.g. 4, 8, 12).
    pub max_unit: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::phases::Entity",
        from = "Column::PhaseId",
        to = "super::phases::Column::Id"
    )]
    Phase,
    #[sea_orm(has_many = "super::subjects::Entity")]
    Subjects,
}

impl Related<super::phases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Phase.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
