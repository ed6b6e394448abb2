use crate::entities::{lifecycle_histories, lifecycle_transitions, profile_states, students};
use crate::error::AcademyError;
use crate::services::{next_table_code, now_utc};
use chrono::{Datelike, NaiveDate};
use models::states::{StudentState, TransitionOrigin};
use models::transitions::{self, reason_satisfies};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

const MIN_AGE_YEARS: i32 = 3;
const MAX_AGE_YEARS: i32 = 120;

pub struct CreateStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub phone: Option<String>,
    pub financially_current: bool,
}

pub struct TransitionStudent {
    pub student_id: Uuid,
    pub to: StudentState,
    pub reason: Option<String>,
    pub origin: TransitionOrigin,
    pub actor: Option<String>,
}

pub struct StudentService;

impl StudentService {
    pub async fn create_student(
        db: &DatabaseConnection,
        cmd: CreateStudent,
    ) -> Result<students::Model, AcademyError> {
        if cmd.first_name.trim().is_empty() || cmd.last_name.trim().is_empty() {
            return Err(AcademyError::Validation(
                "student name cannot be empty".to_string(),
            ));
        }
        validate_email(&cmd.email)?;
        validate_age(cmd.birth_date, now_utc().date())?;

        let txn = db.begin().await?;

        let profile = profile_states::Entity::find()
            .filter(profile_states::Column::Code.eq("prospect"))
            .one(&txn)
            .await?;

        let code = next_table_code::<students::Entity, _>(&txn, "ST-").await?;
        let student = students::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            first_name: Set(cmd.first_name),
            last_name: Set(cmd.last_name),
            email: Set(cmd.email.trim().to_lowercase()),
            birth_date: Set(cmd.birth_date),
            phone: Set(cmd.phone),
            state: Set(StudentState::Prospect),
            profile_state_id: Set(profile.map(|p| p.id)),
            financially_current: Set(cmd.financially_current),
            created_at: Set(now_utc()),
            updated_at: Set(now_utc()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(student)
    }

    /// Applies a lifecycle transition. The write must resolve to an active
    /// row of the transition catalog; a required reason must be non-empty.
    /// Every successful transition appends to the lifecycle history and
    /// applies the mapped profile state without re-validating.
    pub async fn transition(
        db: &DatabaseConnection,
        cmd: TransitionStudent,
    ) -> Result<students::Model, AcademyError> {
        let txn = db.begin().await?;
        let student = Self::transition_in_txn(&txn, cmd).await?;
        txn.commit().await?;
        Ok(student)
    }

    /// Transition body usable from other services' transactions (e.g. the
    /// enrollment ledger activating a student).
    pub async fn transition_in_txn(
        txn: &DatabaseTransaction,
        cmd: TransitionStudent,
    ) -> Result<students::Model, AcademyError> {
        let student = students::Entity::find_by_id(cmd.student_id)
            .one(txn)
            .await?
            .ok_or(AcademyError::NotFound("student"))?;

        let rule = lifecycle_transitions::Entity::find()
            .filter(lifecycle_transitions::Column::StateFrom.eq(student.state))
            .filter(lifecycle_transitions::Column::StateTo.eq(cmd.to))
            .filter(lifecycle_transitions::Column::Active.eq(true))
            .one(txn)
            .await?
            .ok_or_else(|| AcademyError::InvalidTransition {
                from: student.state.to_string(),
                to: cmd.to.to_string(),
            })?;

        if !reason_satisfies(rule.requires_reason, cmd.reason.as_deref()) {
            return Err(AcademyError::MissingReason);
        }

        let state_from = student.state;
        let mut active: students::ActiveModel = student.into();
        active.state = Set(cmd.to);
        if let Some(profile_state_id) = rule.profile_state_id {
            active.profile_state_id = Set(Some(profile_state_id));
        }
        active.updated_at = Set(now_utc());
        let student = active.update(txn).await?;

        // Audit append; if this fails the surrounding transaction fails too.
        lifecycle_histories::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student.id),
            state_from: Set(state_from),
            state_to: Set(cmd.to),
            reason: Set(cmd.reason),
            origin: Set(cmd.origin),
            actor: Set(cmd.actor),
            created_at: Set(now_utc()),
        }
        .insert(txn)
        .await?;

        Ok(student)
    }

    /// Seeds the profile-state and transition catalogs on an empty database.
    /// Idempotent; runs at boot.
    pub async fn seed_lifecycle_catalog(db: &DatabaseConnection) -> Result<(), AcademyError> {
        let txn = db.begin().await?;

        if profile_states::Entity::find().count(&txn).await? == 0 {
            for seed in transitions::PROFILE_STATES {
                profile_states::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    code: Set(seed.code.to_string()),
                    name: Set(seed.name.to_string()),
                    may_book: Set(seed.may_book),
                    may_attend: Set(seed.may_attend),
                    may_use_apps: Set(seed.may_use_apps),
                    may_request_freeze: Set(seed.may_request_freeze),
                }
                .insert(&txn)
                .await?;
            }
        }

        if lifecycle_transitions::Entity::find().count(&txn).await? == 0 {
            let profiles = profile_states::Entity::find().all(&txn).await?;
            for (index, seed) in transitions::TRANSITIONS.iter().enumerate() {
                let profile_state_id = seed.profile_state.and_then(|code| {
                    profiles.iter().find(|p| p.code == code).map(|p| p.id)
                });
                lifecycle_transitions::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    state_from: Set(seed.from),
                    state_to: Set(seed.to),
                    sequence: Set((index as i32 + 1) * 10),
                    active: Set(true),
                    requires_reason: Set(seed.requires_reason),
                    profile_state_id: Set(profile_state_id),
                    description: Set(None),
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;
        Ok(())
    }

    /// Whether the student's profile state grants a capability.
    pub async fn may_book<C: ConnectionTrait>(
        conn: &C,
        student: &students::Model,
    ) -> Result<bool, AcademyError> {
        let Some(profile_state_id) = student.profile_state_id else {
            return Ok(false);
        };
        let profile = profile_states::Entity::find_by_id(profile_state_id)
            .one(conn)
            .await?
            .ok_or(AcademyError::NotFound("profile state"))?;
        Ok(profile.may_book)
    }
}

fn validate_email(email: &str) -> Result<(), AcademyError> {
    let email = email.trim();
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !email.contains(char::is_whitespace)
    });
    if valid {
        Ok(())
    } else {
        Err(AcademyError::Validation(format!(
            "invalid email address: {email}"
        )))
    }
}

fn validate_age(birth_date: NaiveDate, today: NaiveDate) -> Result<(), AcademyError> {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    if !(MIN_AGE_YEARS..=MAX_AGE_YEARS).contains(&age) {
        return Err(AcademyError::Validation(format!(
            "student age must be between {MIN_AGE_YEARS} and {MAX_AGE_YEARS}, got {age}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("ana.maria@example.com").is_ok());
        assert!(validate_email("  ana@academy.edu.co ").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@domain").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("two words@example.com").is_err());
        assert!(validate_email("dot@.com").is_err());
    }

    #[test]
    fn test_age_bounds() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let birthday = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

        assert!(validate_age(birthday(2022, 6, 15), today).is_ok()); // exactly 3
        assert!(validate_age(birthday(2022, 6, 16), today).is_err()); // one day short
        assert!(validate_age(birthday(1905, 6, 15), today).is_ok()); // 120
        assert!(validate_age(birthday(1904, 6, 14), today).is_err()); // 121
        assert!(validate_age(birthday(1990, 1, 1), today).is_ok());
    }
}
