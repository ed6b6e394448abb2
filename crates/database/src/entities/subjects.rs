use models::category::SubjectCategory;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub level_id: Option<Uuid>,
    pub code: String,
    pub name: String,
    pub category: SubjectCategory,
    pub sequence: i32,
    /// 1..N for checkpoint/skill subjects.
    pub unit_number: Option<i32>,
    /// 1..=4, skills only.
    pub skill_slot: Option<i16>,
    /// Inclusive unit range an oral test evaluates.
    pub unit_block_start: Option<i32>,
    pub unit_block_end: Option<i32>,
    pub is_prerequisite: bool,
    pub evaluable: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::levels::Entity",
        from = "Column::LevelId",
        to = "super::levels::Column::Id"
    )]
    Level,
    #[sea_orm(has_many = "super::subject_prerequisites::Entity")]
    SubjectPrerequisites,
    #[sea_orm(has_many = "super::elective_pool_subjects::Entity")]
    ElectivePoolSubjects,
}

impl Related<super::levels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Level.def()
    }
}

impl Related<super::subject_prerequisites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectPrerequisites.def()
    }
}

// Many-to-many relationship with elective pools
impl Related<super::elective_pools::Entity> for Entity {
    fn to() -> RelationDef {
        super::elective_pool_subjects::Relation::Pool.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::elective_pool_subjects::Relation::Subject.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
