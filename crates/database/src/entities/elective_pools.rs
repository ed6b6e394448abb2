use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A set of interchangeable subjects; the booked subject is resolved per
/// student when they enroll in a pool-backed session.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "elective_pools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::elective_pool_subjects::Entity")]
    ElectivePoolSubjects,
    #[sea_orm(has_many = "super::sessions::Entity")]
    Sessions,
}

impl Related<super::elective_pool_subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ElectivePoolSubjects.def()
    }
}

// Many-to-many relationship with subjects
impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        super::elective_pool_subjects::Relation::Subject.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::elective_pool_subjects::Relation::Pool.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
