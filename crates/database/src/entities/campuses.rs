use models::{days::DaySet, states::CampusKind};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campuses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub kind: CampusKind,
    /// Weekdays on which sessions may be scheduled ("MTWRFS" pattern).
    pub allowed_days: DaySet,
    /// General open-hours window, campus-local time.
    pub open_from: Time,
    pub open_until: Time,
    pub default_session_minutes: i32,
    pub default_start: Time,
    pub default_end: Time,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rooms::Entity")]
    Rooms,
    #[sea_orm(has_many = "super::campus_hours::Entity")]
    CampusHours,
    #[sea_orm(has_many = "super::sessions::Entity")]
    Sessions,
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rooms.def()
    }
}

impl Related<super::campus_hours::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CampusHours.def()
    }
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
