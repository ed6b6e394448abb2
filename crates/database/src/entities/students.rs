use models::states::StudentState;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: Date,
    pub phone: Option<String>,
    pub state: StudentState,
    pub profile_state_id: Option<Uuid>,
    /// Consumed from the payments collaborator; the engine never computes it.
    pub financially_current: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile_states::Entity",
        from = "Column::ProfileStateId",
        to = "super::profile_states::Column::Id"
    )]
    ProfileState,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::session_enrollments::Entity")]
    SessionEnrollments,
    #[sea_orm(has_many = "super::academic_history::Entity")]
    AcademicHistory,
    #[sea_orm(has_many = "super::lifecycle_histories::Entity")]
    LifecycleHistories,
    #[sea_orm(has_many = "super::subject_tracking::Entity")]
    SubjectTracking,
}

impl Related<super::profile_states::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProfileState.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::session_enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionEnrollments.def()
    }
}

impl Related<super::academic_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicHistory.def()
    }
}

impl Related<super::lifecycle_histories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LifecycleHistories.def()
    }
}

impl Related<super::subject_tracking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectTracking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
