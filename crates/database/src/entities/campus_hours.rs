use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-weekday open-hours override. A missing row means the campus falls
/// back to its general window for that day. Windows must lie within the
/// general window (validated on write).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campus_hours")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub campus_id: Uuid,
    /// ISO weekday, 1=Monday .. 7=Sunday.
    pub weekday: i16,
    pub open_from: Time,
    pub open_until: Time,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campuses::Entity",
        from = "Column::CampusId",
        to = "super::campuses::Column::Id"
    )]
    Campus,
}

impl Related<super::campuses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campus.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
