use crate::entities::{
    academic_history, enrollment_progress, enrollments, levels, session_enrollments, sessions,
    subjects,
};
use crate::error::AcademyError;
use crate::services::curriculum::CurriculumService;
use crate::services::enrollment::EnrollmentService;
use crate::services::now_utc;
use models::category::SubjectCategory;
use models::progression::{
    self, AttendedRecord, PrerequisiteOutcome, PrerequisiteSubject,
};
use models::states::{
    AttendanceStatus, EnrollmentState, ProgressState, SessionEnrollmentState, SessionState,
};
use sea_orm::prelude::DateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
};
use std::collections::HashSet;
use uuid::Uuid;

pub struct ProgressionService;

impl ProgressionService {
    /// All subjects the student has attended, per the academic history.
    pub async fn attended_records<C: ConnectionTrait>(
        conn: &C,
        student_id: Uuid,
    ) -> Result<Vec<AttendedRecord>, AcademyError> {
        let rows = academic_history::Entity::find()
            .filter(academic_history::Column::StudentId.eq(student_id))
            .filter(academic_history::Column::AttendanceStatus.eq(AttendanceStatus::Attended))
            .find_also_related(subjects::Entity)
            .all(conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, subject)| subject)
            .map(|subject| AttendedRecord {
                subject_id: subject.id,
                category: subject.category,
                unit_number: subject.unit_number,
            })
            .collect())
    }

    /// Max-completed-unit for a student: the largest U with every unit
    /// 1..=U holding an attended checkpoint and four distinct attended
    /// skills. With no history at all, falls back to the assigned level's
    /// max unit (with a warning), matching what placement assumed.
    pub async fn max_completed_unit<C: ConnectionTrait>(
        conn: &C,
        student_id: Uuid,
    ) -> Result<i32, AcademyError> {
        let attended = Self::attended_records(conn, student_id).await?;
        if attended.is_empty() {
            let enrollment =
                EnrollmentService::active_enrollment_for_student(conn, student_id).await?;
            if let Some(level_id) = enrollment.and_then(|e| e.current_level_id) {
                let level = levels::Entity::find_by_id(level_id)
                    .one(conn)
                    .await?
                    .ok_or(AcademyError::NotFound("level"))?;
                log::warn!(
                    "student {student_id} has no academic history; using assigned level {} max unit {}",
                    level.code,
                    level.max_unit
                );
                return Ok(level.max_unit);
            }
            log::warn!("student {student_id} has no history and no assigned level");
            return Ok(0);
        }

        Ok(progression::max_completed_unit(&attended))
    }

    /// Subject ids with an attended history row for the student.
    pub async fn completed_subject_ids<C: ConnectionTrait>(
        conn: &C,
        student_id: Uuid,
    ) -> Result<HashSet<Uuid>, AcademyError> {
        let rows = academic_history::Entity::find()
            .filter(academic_history::Column::StudentId.eq(student_id))
            .filter(academic_history::Column::AttendanceStatus.eq(AttendanceStatus::Attended))
            .all(conn)
            .await?;
        Ok(rows.into_iter().map(|h| h.subject_id).collect())
    }

    /// Checkpoint subjects sitting in a future booked-but-not-attended
    /// session of this student. These relax the prerequisite gate for
    /// same-unit skills.
    pub async fn scheduled_checkpoint_ids<C: ConnectionTrait>(
        conn: &C,
        student_id: Uuid,
        now: DateTime,
    ) -> Result<HashSet<Uuid>, AcademyError> {
        let bookings = session_enrollments::Entity::find()
            .filter(session_enrollments::Column::StudentId.eq(student_id))
            .filter(session_enrollments::Column::State.is_in([
                SessionEnrollmentState::Pending,
                SessionEnrollmentState::Confirmed,
            ]))
            .find_also_related(sessions::Entity)
            .all(conn)
            .await?;

        let mut candidate_ids = HashSet::new();
        for (booking, session) in bookings {
            let Some(session) = session else { continue };
            if session.state == SessionState::Cancelled || session.starts_at <= now {
                continue;
            }
            if let Some(subject_id) = booking.effective_subject_id.or(session.subject_id) {
                candidate_ids.insert(subject_id);
            }
        }
        if candidate_ids.is_empty() {
            return Ok(candidate_ids);
        }

        let checkpoint_rows = subjects::Entity::find()
            .filter(subjects::Column::Id.is_in(candidate_ids.iter().copied().collect::<Vec<_>>()))
            .filter(subjects::Column::Category.eq(SubjectCategory::Checkpoint))
            .all(conn)
            .await?;
        Ok(checkpoint_rows.into_iter().map(|s| s.id).collect())
    }

    /// Runs the prerequisite gate for a candidate subject. Direct
    /// prerequisites must each be completed, or - checkpoints only - be
    /// scheduled on the student's calendar.
    pub async fn check_prerequisites<C: ConnectionTrait>(
        conn: &C,
        subject: &subjects::Model,
        student_id: Uuid,
        now: DateTime,
    ) -> Result<PrerequisiteOutcome, AcademyError> {
        let prerequisites = CurriculumService::prerequisites_of(conn, subject.id).await?;
        if prerequisites.is_empty() {
            return Ok(PrerequisiteOutcome::satisfied());
        }

        let completed = Self::completed_subject_ids(conn, student_id).await?;
        let scheduled = Self::scheduled_checkpoint_ids(conn, student_id, now).await?;

        let prerequisite_subjects: Vec<PrerequisiteSubject> = prerequisites
            .into_iter()
            .map(|s| PrerequisiteSubject {
                id: s.id,
                name: s.name,
                category: s.category,
                unit_number: s.unit_number,
            })
            .collect();

        Ok(progression::check_prerequisites(
            &prerequisite_subjects,
            &completed,
            &scheduled,
        ))
    }

    /// The student's progress table: every subject of the enrollment's
    /// program with its progress state.
    pub async fn progress_table<C: ConnectionTrait>(
        conn: &C,
        enrollment_id: Uuid,
    ) -> Result<Vec<(subjects::Model, enrollment_progress::Model)>, AcademyError> {
        let rows = enrollment_progress::Entity::find()
            .filter(enrollment_progress::Column::EnrollmentId.eq(enrollment_id))
            .find_also_related(subjects::Entity)
            .all(conn)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(progress, subject)| subject.map(|s| (s, progress)))
            .collect())
    }

    /// After an attended event: complete the subject's progress row on the
    /// student's active enrollment, and advance the current pointer while
    /// the pointed-at subject is completed. Exhausting the plan finishes
    /// the enrollment.
    pub async fn advance_after_attendance(
        txn: &DatabaseTransaction,
        student_id: Uuid,
        attended_subject_id: Uuid,
        grade: Option<f32>,
    ) -> Result<(), AcademyError> {
        let Some(enrollment) =
            EnrollmentService::active_enrollment_for_student(txn, student_id).await?
        else {
            return Ok(());
        };

        // Complete the attended subject's progress row, wherever it sits.
        let progress = enrollment_progress::Entity::find()
            .filter(enrollment_progress::Column::EnrollmentId.eq(enrollment.id))
            .filter(enrollment_progress::Column::SubjectId.eq(attended_subject_id))
            .one(txn)
            .await?;
        if let Some(progress) = progress
            && progress.state != ProgressState::Completed
        {
            let mut active: enrollment_progress::ActiveModel = progress.into();
            active.state = Set(ProgressState::Completed);
            active.completed_on = Set(Some(now_utc().date()));
            if grade.is_some() {
                active.final_grade = Set(grade);
            }
            active.updated_at = Set(now_utc());
            active.update(txn).await?;
        }

        // Advance while the current subject is completed.
        let completed = Self::completed_subject_ids(txn, student_id).await?;
        let mut enrollment = enrollment;
        loop {
            let Some(current_subject_id) = enrollment.current_subject_id else {
                return Ok(());
            };
            if !completed.contains(&current_subject_id) {
                return Ok(());
            }
            match EnrollmentService::advance_in_txn(txn, enrollment.clone()).await {
                Ok(advanced) => enrollment = advanced,
                Err(AcademyError::PlanCompleted) => {
                    let mut active: enrollments::ActiveModel = enrollment.into();
                    active.state = Set(EnrollmentState::Finished);
                    active.finished_on = Set(Some(now_utc().date()));
                    active.updated_at = Set(now_utc());
                    active.update(txn).await?;
                    log::info!("plan completed for student {student_id}; enrollment finished");
                    return Ok(());
                }
                Err(other) => return Err(other),
            }
        }
    }
}
