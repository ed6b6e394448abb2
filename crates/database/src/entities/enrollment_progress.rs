use models::states::ProgressState;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per (enrollment, subject), generated when the enrollment
/// activates. Owned exclusively by the enrollment (cascade).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollment_progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub subject_id: Uuid,
    pub state: ProgressState,
    pub started_on: Option<Date>,
    pub completed_on: Option<Date>,
    pub final_grade: Option<f32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollments::Column::Id"
    )]
    Enrollment,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
