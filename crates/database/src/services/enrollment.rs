use crate::entities::{
    enrollment_progress, enrollments, levels, plans, students, subject_tracking, subjects,
};
use crate::error::AcademyError;
use crate::services::curriculum::CurriculumService;
use crate::services::student::{StudentService, TransitionStudent};
use crate::services::{next_table_code, now_utc};
use models::states::{
    EnrollmentState, ProgressState, StudentState, TrackingState, TransitionOrigin,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

pub struct CreateEnrollment {
    pub student_id: Uuid,
    pub plan_id: Uuid,
    /// Explicit starting pointer; defaults to the first subject in plan order.
    pub initial_subject_id: Option<Uuid>,
    pub actor: Option<String>,
}

pub struct EnrollmentService;

impl EnrollmentService {
    /// Places a student on a plan: activates the enrollment, initializes the
    /// current pointer, and generates one progress row per subject of the
    /// plan's program plus the per-subject tracking rows.
    pub async fn create_enrollment(
        db: &DatabaseConnection,
        cmd: CreateEnrollment,
    ) -> Result<enrollments::Model, AcademyError> {
        let txn = db.begin().await?;

        let student = students::Entity::find_by_id(cmd.student_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("student"))?;
        let plan = plans::Entity::find_by_id(cmd.plan_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("plan"))?;

        let existing = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(cmd.student_id))
            .filter(enrollments::Column::PlanId.eq(cmd.plan_id))
            .all(&txn)
            .await?;
        if existing.iter().any(|e| e.state.blocks_duplicates()) {
            return Err(AcademyError::DuplicateEnrollment);
        }

        // Walk the student to active through the transition catalog; origin
        // is recorded as `enrollment` in the lifecycle history.
        for target in [StudentState::Enrolled, StudentState::Active] {
            let current = students::Entity::find_by_id(student.id)
                .one(&txn)
                .await?
                .ok_or(AcademyError::NotFound("student"))?;
            if matches!(current.state, StudentState::Prospect | StudentState::Enrolled)
                && current.state != target
            {
                StudentService::transition_in_txn(
                    &txn,
                    TransitionStudent {
                        student_id: student.id,
                        to: target,
                        reason: None,
                        origin: TransitionOrigin::Enrollment,
                        actor: cmd.actor.clone(),
                    },
                )
                .await?;
            }
        }

        let ordered = CurriculumService::plan_order(&txn, plan.id).await?;
        let initial_subject = match cmd.initial_subject_id {
            Some(subject_id) => Some(
                subjects::Entity::find_by_id(subject_id)
                    .one(&txn)
                    .await?
                    .ok_or(AcademyError::NotFound("subject"))?,
            ),
            None => ordered.first().cloned(),
        };
        let (current_subject_id, current_level_id, current_phase_id) =
            pointer_for(&txn, initial_subject.as_ref()).await?;

        let code = next_table_code::<enrollments::Entity, _>(&txn, "EN-").await?;
        let enrollment = enrollments::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            student_id: Set(cmd.student_id),
            plan_id: Set(cmd.plan_id),
            state: Set(EnrollmentState::Active),
            current_phase_id: Set(current_phase_id),
            current_level_id: Set(current_level_id),
            current_subject_id: Set(current_subject_id),
            financial_override: Set(false),
            final_grade: Set(None),
            started_on: Set(Some(now_utc().date())),
            finished_on: Set(None),
            created_at: Set(now_utc()),
            updated_at: Set(now_utc()),
        }
        .insert(&txn)
        .await?;

        // One progress row per subject of the plan's program, plus the
        // portal tracking row for each subject the student doesn't have yet.
        let program_subjects = CurriculumService::program_subjects(&txn, plan.program_id).await?;
        for subject in &program_subjects {
            let state = if Some(subject.id) == current_subject_id {
                ProgressState::InProgress
            } else {
                ProgressState::Pending
            };
            enrollment_progress::ActiveModel {
                id: Set(Uuid::new_v4()),
                enrollment_id: Set(enrollment.id),
                subject_id: Set(subject.id),
                state: Set(state),
                started_on: Set((state == ProgressState::InProgress).then(|| now_utc().date())),
                completed_on: Set(None),
                final_grade: Set(None),
                created_at: Set(now_utc()),
                updated_at: Set(now_utc()),
            }
            .insert(&txn)
            .await?;

            let tracked = subject_tracking::Entity::find()
                .filter(subject_tracking::Column::StudentId.eq(cmd.student_id))
                .filter(subject_tracking::Column::SubjectId.eq(subject.id))
                .one(&txn)
                .await?;
            if tracked.is_none() {
                subject_tracking::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    student_id: Set(cmd.student_id),
                    subject_id: Set(subject.id),
                    session_id: Set(None),
                    state: Set(TrackingState::Pending),
                    attended: Set(false),
                    grade: Set(None),
                    notes: Set(None),
                    created_at: Set(now_utc()),
                    updated_at: Set(now_utc()),
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;
        log::info!(
            "enrollment {} created for student {} on plan {} ({} progress rows)",
            enrollment.code,
            student.code,
            plan.code,
            program_subjects.len()
        );
        Ok(enrollment)
    }

    /// Moves the current pointer to the next subject in plan order, marking
    /// the new subject's progress row in-progress. Fails with
    /// `PlanCompleted` when the plan is exhausted.
    pub async fn advance_to_next_subject(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
    ) -> Result<enrollments::Model, AcademyError> {
        let txn = db.begin().await?;
        let enrollment = find_enrollment(&txn, enrollment_id).await?;
        let advanced = Self::advance_in_txn(&txn, enrollment).await?;
        txn.commit().await?;
        Ok(advanced)
    }

    pub async fn advance_in_txn(
        txn: &DatabaseTransaction,
        enrollment: enrollments::Model,
    ) -> Result<enrollments::Model, AcademyError> {
        let current_subject_id = enrollment
            .current_subject_id
            .ok_or_else(|| AcademyError::Validation("enrollment has no current subject".to_string()))?;

        let next = CurriculumService::next_subject_in_plan(txn, enrollment.plan_id, current_subject_id)
            .await?
            .ok_or(AcademyError::PlanCompleted)?;

        let (subject_id, level_id, phase_id) = pointer_for(txn, Some(&next)).await?;

        let enrollment_id = enrollment.id;
        let mut active: enrollments::ActiveModel = enrollment.into();
        active.current_subject_id = Set(subject_id);
        active.current_level_id = Set(level_id);
        active.current_phase_id = Set(phase_id);
        active.updated_at = Set(now_utc());
        let updated = active.update(txn).await?;

        // The freshly pointed-at subject starts progressing.
        let progress = enrollment_progress::Entity::find()
            .filter(enrollment_progress::Column::EnrollmentId.eq(enrollment_id))
            .filter(enrollment_progress::Column::SubjectId.eq(next.id))
            .one(txn)
            .await?;
        if let Some(progress) = progress
            && progress.state == ProgressState::Pending
        {
            let mut active: enrollment_progress::ActiveModel = progress.into();
            active.state = Set(ProgressState::InProgress);
            active.started_on = Set(Some(now_utc().date()));
            active.updated_at = Set(now_utc());
            active.update(txn).await?;
        }

        Ok(updated)
    }

    pub async fn suspend(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
    ) -> Result<enrollments::Model, AcademyError> {
        let txn = db.begin().await?;
        let enrollment = find_enrollment(&txn, enrollment_id).await?;
        if enrollment.state != EnrollmentState::Active {
            return Err(AcademyError::InvalidTransition {
                from: enrollment.state.to_string(),
                to: EnrollmentState::Suspended.to_string(),
            });
        }
        let updated = set_state(&txn, enrollment, EnrollmentState::Suspended).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Reactivation from suspension requires the student to be financially
    /// current, unless a coordinator overrides (recorded on the enrollment).
    pub async fn reactivate(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
        actor_is_coordinator: bool,
    ) -> Result<enrollments::Model, AcademyError> {
        let txn = db.begin().await?;
        let enrollment = find_enrollment(&txn, enrollment_id).await?;
        if enrollment.state != EnrollmentState::Suspended {
            return Err(AcademyError::InvalidTransition {
                from: enrollment.state.to_string(),
                to: EnrollmentState::Active.to_string(),
            });
        }

        let student = students::Entity::find_by_id(enrollment.student_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("student"))?;

        let mut override_applied = false;
        if !student.financially_current {
            if !actor_is_coordinator {
                return Err(AcademyError::FinancialBlock);
            }
            override_applied = true;
            log::warn!(
                "enrollment {} reactivated with outstanding balance (coordinator override)",
                enrollment.code
            );
        }

        let mut active: enrollments::ActiveModel = enrollment.into();
        active.state = Set(EnrollmentState::Active);
        if override_applied {
            active.financial_override = Set(true);
        }
        active.updated_at = Set(now_utc());
        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    pub async fn complete(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
        final_grade: f32,
    ) -> Result<enrollments::Model, AcademyError> {
        Self::finish_with_grade(db, enrollment_id, final_grade, false).await
    }

    /// A failed enrollment also closes, but its open progress rows are
    /// marked failed rather than left dangling.
    pub async fn fail(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
        final_grade: f32,
    ) -> Result<enrollments::Model, AcademyError> {
        Self::finish_with_grade(db, enrollment_id, final_grade, true).await
    }

    async fn finish_with_grade(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
        final_grade: f32,
        failed: bool,
    ) -> Result<enrollments::Model, AcademyError> {
        if !(0.0..=100.0).contains(&final_grade) {
            return Err(AcademyError::Validation(format!(
                "final grade must be within 0..=100, got {final_grade}"
            )));
        }

        let txn = db.begin().await?;
        let enrollment = find_enrollment(&txn, enrollment_id).await?;
        if !matches!(
            enrollment.state,
            EnrollmentState::Active | EnrollmentState::Suspended
        ) {
            return Err(AcademyError::InvalidTransition {
                from: enrollment.state.to_string(),
                to: EnrollmentState::Finished.to_string(),
            });
        }

        if failed {
            let open_rows = enrollment_progress::Entity::find()
                .filter(enrollment_progress::Column::EnrollmentId.eq(enrollment_id))
                .filter(
                    enrollment_progress::Column::State
                        .is_in([ProgressState::Pending, ProgressState::InProgress]),
                )
                .all(&txn)
                .await?;
            for row in open_rows {
                let mut active: enrollment_progress::ActiveModel = row.into();
                active.state = Set(ProgressState::Failed);
                active.updated_at = Set(now_utc());
                active.update(&txn).await?;
            }
        }

        let mut active: enrollments::ActiveModel = enrollment.into();
        active.state = Set(EnrollmentState::Finished);
        active.final_grade = Set(Some(final_grade));
        active.finished_on = Set(Some(now_utc().date()));
        active.updated_at = Set(now_utc());
        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Homologation recognizes outside coursework: the enrollment closes as
    /// homologated and its open progress rows complete. No academic-history
    /// rows are written, so homologated subjects never count toward the
    /// max-completed-unit.
    pub async fn homologate(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
        justification: &str,
    ) -> Result<enrollments::Model, AcademyError> {
        if justification.trim().is_empty() {
            return Err(AcademyError::MissingReason);
        }

        let txn = db.begin().await?;
        let enrollment = find_enrollment(&txn, enrollment_id).await?;
        if !matches!(
            enrollment.state,
            EnrollmentState::Active | EnrollmentState::Suspended
        ) {
            return Err(AcademyError::InvalidTransition {
                from: enrollment.state.to_string(),
                to: EnrollmentState::Homologated.to_string(),
            });
        }

        let open_rows = enrollment_progress::Entity::find()
            .filter(enrollment_progress::Column::EnrollmentId.eq(enrollment_id))
            .filter(
                enrollment_progress::Column::State
                    .is_in([ProgressState::Pending, ProgressState::InProgress]),
            )
            .all(&txn)
            .await?;
        for row in open_rows {
            let mut active: enrollment_progress::ActiveModel = row.into();
            active.state = Set(ProgressState::Completed);
            active.completed_on = Set(Some(now_utc().date()));
            active.updated_at = Set(now_utc());
            active.update(&txn).await?;
        }

        log::info!(
            "enrollment {} homologated: {}",
            enrollment.code,
            justification.trim()
        );

        let updated = set_state(&txn, enrollment, EnrollmentState::Homologated).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// The student's single active enrollment, if any. When several plans
    /// are involved the most recently started one wins.
    pub async fn active_enrollment_for_student<C: ConnectionTrait>(
        conn: &C,
        student_id: Uuid,
    ) -> Result<Option<enrollments::Model>, AcademyError> {
        let mut rows = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::State.eq(EnrollmentState::Active))
            .all(conn)
            .await?;
        rows.sort_by_key(|e| std::cmp::Reverse(e.created_at));
        Ok(rows.into_iter().next())
    }
}

async fn find_enrollment(
    txn: &DatabaseTransaction,
    enrollment_id: Uuid,
) -> Result<enrollments::Model, AcademyError> {
    enrollments::Entity::find_by_id(enrollment_id)
        .one(txn)
        .await?
        .ok_or(AcademyError::NotFound("enrollment"))
}

async fn set_state(
    txn: &DatabaseTransaction,
    enrollment: enrollments::Model,
    state: EnrollmentState,
) -> Result<enrollments::Model, AcademyError> {
    let mut active: enrollments::ActiveModel = enrollment.into();
    active.state = Set(state);
    active.updated_at = Set(now_utc());
    Ok(active.update(txn).await?)
}

/// Derives the (subject, level, phase) pointer triple from a subject.
async fn pointer_for<C: ConnectionTrait>(
    conn: &C,
    subject: Option<&subjects::Model>,
) -> Result<(Option<Uuid>, Option<Uuid>, Option<Uuid>), AcademyError> {
    let Some(subject) = subject else {
        return Ok((None, None, None));
    };
    let level = match subject.level_id {
        Some(level_id) => levels::Entity::find_by_id(level_id).one(conn).await?,
        None => None,
    };
    Ok((
        Some(subject.id),
        level.as_ref().map(|l| l.id),
        level.as_ref().map(|l| l.phase_id),
    ))
}
