use models::states::StudentState;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog of legal student lifecycle transitions. Writes that change a
/// student's state must resolve to an active row here; nothing else in the
/// engine is allowed to branch on (from, to) pairs.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lifecycle_transitions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub state_from: StudentState,
    pub state_to: StudentState,
    pub sequence: i32,
    pub active: bool,
    pub requires_reason: bool,
    /// Profile state assigned to the student when this transition runs.
    pub profile_state_id: Option<Uuid>,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile_states::Entity",
        from = "Column::ProfileStateId",
        to = "super::profile_states::Column::Id"
    )]
    ProfileState,
}

impl Related<super::profile_states::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProfileState.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
