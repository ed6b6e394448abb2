use models::progression::PrerequisiteOutcome;
use sea_orm::DbErr;
use thiserror::Error;

/// Error taxonomy surfaced by the engine. Validation-class errors are never
/// retried; only serialization conflicts qualify for the bounded retry in
/// [`crate::db::with_conflict_retry`].
#[derive(Debug, Error)]
pub enum AcademyError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("prerequisite cycle detected at subject {subject}")]
    CycleDetected { subject: String },

    #[error("campus {campus} does not allow sessions on weekday {weekday}")]
    DayNotAllowed { campus: String, weekday: u32 },

    #[error("session start {local_start} (campus-local) is outside the campus window")]
    StartOutsideWindow { local_start: String },

    #[error("session end {local_end} (campus-local) is outside the campus window")]
    EndOutsideWindow { local_end: String },

    #[error("{resource} is already booked by overlapping session {conflicting}")]
    ResourceConflict { resource: String, conflicting: String },

    #[error("session is full ({capacity} seats)")]
    SessionFull { capacity: i32 },

    #[error("prerequisites unmet: {}", .outcome.describe())]
    PrerequisitesUnmet { outcome: PrerequisiteOutcome },

    #[error("student is not financially current")]
    FinancialBlock,

    #[error("subject '{subject}' was already completed by the student")]
    AlreadyCompleted { subject: String },

    #[error("an active enrollment already exists for this booking")]
    DuplicateEnrollment,

    #[error("no next subject remains: the plan is completed")]
    PlanCompleted,

    #[error("transition from '{from}' to '{to}' is not allowed")]
    InvalidTransition { from: String, to: String },

    #[error("a non-empty reason is required for this operation")]
    MissingReason,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("synchronizer failure, event rolled back: {0}")]
    SyncFailure(String),

    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl AcademyError {
    /// Serialization conflicts and deadlocks are the only errors the caller
    /// may retry; everything else is a definitive answer.
    pub fn is_serialization_conflict(&self) -> bool {
        match self {
            Self::Db(err) => {
                let text = err.to_string();
                text.contains("40001")
                    || text.contains("serialization failure")
                    || text.contains("could not serialize")
                    || text.contains("deadlock")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::category::SubjectCategory;
    use models::progression::PrerequisiteSubject;
    use uuid::Uuid;

    #[test]
    fn test_prerequisites_unmet_message_groups_skills() {
        let outcome = PrerequisiteOutcome {
            missing: (1..=4)
                .map(|slot| PrerequisiteSubject {
                    id: Uuid::new_v4(),
                    name: format!("Skill 1.{slot}"),
                    category: SubjectCategory::Skill,
                    unit_number: Some(1),
                })
                .collect(),
        };
        let err = AcademyError::PrerequisitesUnmet { outcome };
        assert_eq!(
            err.to_string(),
            "prerequisites unmet: Skills of Unit 1 (4 missing)"
        );
    }

    #[test]
    fn test_only_conflicts_are_retryable() {
        assert!(!AcademyError::MissingReason.is_serialization_conflict());
        assert!(!AcademyError::PlanCompleted.is_serialization_conflict());
        let db = AcademyError::Db(DbErr::Custom(
            "ERROR: could not serialize access due to concurrent update (SQLSTATE 40001)"
                .to_string(),
        ));
        assert!(db.is_serialization_conflict());
    }
}
