use crate::entities::{
    academic_history, session_enrollments, sessions, students, subject_tracking,
};
use crate::error::AcademyError;
use crate::services::booking::BookingService;
use crate::services::now_utc;
use crate::services::progression::ProgressionService;
use models::states::{AttendanceStatus, SessionEnrollmentState, TrackingState};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, TransactionTrait,
};
use uuid::Uuid;

/// Attendance event applied to a confirmed booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceMark {
    Attended,
    Absent,
}

impl AttendanceMark {
    fn booking_state(self) -> SessionEnrollmentState {
        match self {
            Self::Attended => SessionEnrollmentState::Attended,
            Self::Absent => SessionEnrollmentState::Absent,
        }
    }

    fn attendance_status(self) -> AttendanceStatus {
        match self {
            Self::Attended => AttendanceStatus::Attended,
            Self::Absent => AttendanceStatus::Absent,
        }
    }
}

/// Coach-side correction pushed through the per-subject tracking ledger.
pub struct TrackingUpdate {
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub attended: Option<bool>,
    pub grade: Option<f32>,
    pub notes: Option<String>,
    pub session_id: Option<Uuid>,
}

pub struct SyncService;

impl SyncService {
    /// Applies an attendance event to a booking and propagates it through
    /// the academic history and the per-subject tracking ledger, all inside
    /// one transaction. Any mirror failure rolls the whole event back.
    pub async fn apply_attendance(
        db: &DatabaseConnection,
        booking_id: Uuid,
        mark: AttendanceMark,
        actor: Option<String>,
    ) -> Result<(), AcademyError> {
        let txn = db.begin().await?;

        let booking = session_enrollments::Entity::find_by_id(booking_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("session enrollment"))?;

        // Attendance is one-way: a booking marked attended stays attended.
        if booking.state == SessionEnrollmentState::Attended {
            return Err(AcademyError::Validation(
                "attendance is already recorded for this booking".to_string(),
            ));
        }
        if booking.state != SessionEnrollmentState::Confirmed
            && booking.state != SessionEnrollmentState::Absent
        {
            return Err(AcademyError::Validation(format!(
                "attendance can only be recorded for confirmed bookings, found {}",
                booking.state
            )));
        }

        let session = sessions::Entity::find_by_id(booking.session_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("session"))?;
        if !session.state.allows_attendance() {
            return Err(AcademyError::Validation(format!(
                "attendance requires a session in progress or done, found {}",
                session.state
            )));
        }

        let student_id = booking.student_id;
        let mut active: session_enrollments::ActiveModel = booking.clone().into();
        active.state = Set(mark.booking_state());
        active.attendance_marked_at = Set(Some(now_utc()));
        active.updated_at = Set(now_utc());
        let booking = active.update(&txn).await?;

        let effective_subject_id =
            Self::mirror_booking_to_ledgers(&txn, &booking, &session, mark)
                .await
                .map_err(|err| match err {
                    AcademyError::Db(db_err) => AcademyError::SyncFailure(db_err.to_string()),
                    other => other,
                })?;

        if mark == AttendanceMark::Attended {
            let grade = current_grade(&txn, student_id, effective_subject_id).await?;
            ProgressionService::advance_after_attendance(
                &txn,
                student_id,
                effective_subject_id,
                grade,
            )
            .await?;
        }

        if let Some(actor) = actor {
            log::info!(
                "attendance {:?} recorded by {actor} for booking {} (session {})",
                mark,
                booking.id,
                session.code
            );
        }

        txn.commit().await?;
        Ok(())
    }

    /// Academic-history upsert plus tracking mirror for one booking event.
    /// Returns the effective subject the event counted for.
    async fn mirror_booking_to_ledgers(
        txn: &DatabaseTransaction,
        booking: &session_enrollments::Model,
        session: &sessions::Model,
        mark: AttendanceMark,
    ) -> Result<Uuid, AcademyError> {
        let student = students::Entity::find_by_id(booking.student_id)
            .one(txn)
            .await?
            .ok_or(AcademyError::NotFound("student"))?;

        let effective_subject_id = match booking.effective_subject_id.or(session.subject_id) {
            Some(id) => id,
            None => BookingService::resolve_effective_subject(txn, session, student.id)
                .await?
                .map(|s| s.id)
                .ok_or_else(|| {
                    AcademyError::SyncFailure(format!(
                        "no effective subject resolvable for session {}",
                        session.code
                    ))
                })?,
        };

        // Resolve-or-create the history row. Pending attendance is
        // overwritten; attended/absent marks already on the row win (the
        // coach portal takes precedence), but the grade still mirrors.
        let existing = academic_history::Entity::find()
            .filter(academic_history::Column::StudentId.eq(student.id))
            .filter(academic_history::Column::SessionId.eq(session.id))
            .one(txn)
            .await?;

        let tracking = subject_tracking::Entity::find()
            .filter(subject_tracking::Column::StudentId.eq(student.id))
            .filter(subject_tracking::Column::SubjectId.eq(effective_subject_id))
            .one(txn)
            .await?;
        let tracked_grade = tracking.as_ref().and_then(|t| t.grade);
        let tracked_notes = tracking.as_ref().and_then(|t| t.notes.clone());

        let history = match existing {
            Some(row) => {
                let keep_attendance = row.attendance_status != AttendanceStatus::Pending;
                let mut active: academic_history::ActiveModel = row.into();
                if !keep_attendance {
                    active.attendance_status = Set(mark.attendance_status());
                    active.attended = Set(mark.attendance_status().attended_flag());
                    active.attendance_marked_at = Set(Some(now_utc()));
                }
                if tracked_grade.is_some() {
                    active.grade = Set(tracked_grade);
                    active.grade_marked_at = Set(Some(now_utc()));
                    active.notes = Set(tracked_notes.clone());
                }
                active.updated_at = Set(now_utc());
                active.update(txn).await?
            }
            None => {
                let row = BookingService::insert_history_row(
                    txn,
                    &student,
                    session,
                    effective_subject_id,
                    mark.attendance_status(),
                )
                .await?;
                if tracked_grade.is_some() {
                    let mut active: academic_history::ActiveModel = row.into();
                    active.grade = Set(tracked_grade);
                    active.grade_marked_at = Set(Some(now_utc()));
                    active.notes = Set(tracked_notes.clone());
                    active.update(txn).await?
                } else {
                    row
                }
            }
        };

        // Mirror into the per-subject tracking row, creating it if the
        // student never got one (e.g. subject outside their plan).
        let attended_flag = mark == AttendanceMark::Attended;
        match tracking {
            Some(row) => {
                let mut active: subject_tracking::ActiveModel = row.clone().into();
                active.attended = Set(attended_flag);
                active.state = Set(TrackingState::Registered);
                if row.session_id.is_none() {
                    active.session_id = Set(Some(session.id));
                }
                if let Some(grade) = history.grade {
                    active.grade = Set(Some(grade));
                }
                active.updated_at = Set(now_utc());
                active.update(txn).await?;
            }
            None => {
                subject_tracking::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    student_id: Set(student.id),
                    subject_id: Set(effective_subject_id),
                    session_id: Set(Some(session.id)),
                    state: Set(TrackingState::Registered),
                    attended: Set(attended_flag),
                    grade: Set(history.grade),
                    notes: Set(None),
                    created_at: Set(now_utc()),
                    updated_at: Set(now_utc()),
                }
                .insert(txn)
                .await?;
            }
        }

        Ok(effective_subject_id)
    }

    /// Applies a tracking-side write (coach grade/notes/attendance). Unless
    /// `skip_history_sync` is set - which internal mirror writes use to
    /// break recursion - the update is mirrored into the academic history
    /// when the linked session is in progress or done.
    pub async fn apply_tracking_update(
        db: &DatabaseConnection,
        update: TrackingUpdate,
        skip_history_sync: bool,
    ) -> Result<subject_tracking::Model, AcademyError> {
        let txn = db.begin().await?;

        let existing = subject_tracking::Entity::find()
            .filter(subject_tracking::Column::StudentId.eq(update.student_id))
            .filter(subject_tracking::Column::SubjectId.eq(update.subject_id))
            .one(&txn)
            .await?;

        let tracking = match existing {
            Some(row) => {
                let mut active: subject_tracking::ActiveModel = row.into();
                if let Some(attended) = update.attended {
                    active.attended = Set(attended);
                    active.state = Set(TrackingState::Registered);
                }
                if update.grade.is_some() {
                    active.grade = Set(update.grade);
                }
                if update.notes.is_some() {
                    active.notes = Set(update.notes.clone());
                }
                if let Some(session_id) = update.session_id {
                    active.session_id = Set(Some(session_id));
                }
                active.updated_at = Set(now_utc());
                active.update(&txn).await?
            }
            None => {
                subject_tracking::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    student_id: Set(update.student_id),
                    subject_id: Set(update.subject_id),
                    session_id: Set(update.session_id),
                    state: Set(TrackingState::Pending),
                    attended: Set(update.attended.unwrap_or(false)),
                    grade: Set(update.grade),
                    notes: Set(update.notes.clone()),
                    created_at: Set(now_utc()),
                    updated_at: Set(now_utc()),
                }
                .insert(&txn)
                .await?
            }
        };

        if !skip_history_sync {
            Self::mirror_tracking_to_history(&txn, &tracking)
                .await
                .map_err(|err| match err {
                    AcademyError::Db(db_err) => AcademyError::SyncFailure(db_err.to_string()),
                    other => other,
                })?;
        }

        txn.commit().await?;
        Ok(tracking)
    }

    /// Tracking → history mirror. Same conflict policy as the booking side:
    /// only pending attendance is overwritten, grade and notes always land.
    async fn mirror_tracking_to_history(
        txn: &DatabaseTransaction,
        tracking: &subject_tracking::Model,
    ) -> Result<(), AcademyError> {
        let Some(session_id) = tracking.session_id else {
            return Ok(());
        };
        let session = sessions::Entity::find_by_id(session_id)
            .one(txn)
            .await?
            .ok_or(AcademyError::NotFound("session"))?;
        if !session.state.allows_attendance() {
            log::warn!(
                "tracking write for session {} not mirrored: state {}",
                session.code,
                session.state
            );
            return Ok(());
        }

        let status = if tracking.attended {
            AttendanceStatus::Attended
        } else {
            AttendanceStatus::Absent
        };

        let existing = academic_history::Entity::find()
            .filter(academic_history::Column::StudentId.eq(tracking.student_id))
            .filter(academic_history::Column::SessionId.eq(session.id))
            .one(txn)
            .await?;

        match existing {
            Some(row) => {
                let keep_attendance = row.attendance_status != AttendanceStatus::Pending;
                let mut active: academic_history::ActiveModel = row.into();
                if !keep_attendance {
                    active.attendance_status = Set(status);
                    active.attended = Set(status.attended_flag());
                    active.attendance_marked_at = Set(Some(now_utc()));
                }
                if tracking.grade.is_some() {
                    active.grade = Set(tracking.grade);
                    active.grade_marked_at = Set(Some(now_utc()));
                }
                if tracking.notes.is_some() {
                    active.notes = Set(tracking.notes.clone());
                }
                active.updated_at = Set(now_utc());
                active.update(txn).await?;
            }
            None => {
                let student = students::Entity::find_by_id(tracking.student_id)
                    .one(txn)
                    .await?
                    .ok_or(AcademyError::NotFound("student"))?;
                let row = BookingService::insert_history_row(
                    txn,
                    &student,
                    &session,
                    tracking.subject_id,
                    status,
                )
                .await?;
                if tracking.grade.is_some() || tracking.notes.is_some() {
                    let mut active: academic_history::ActiveModel = row.into();
                    if tracking.grade.is_some() {
                        active.grade = Set(tracking.grade);
                        active.grade_marked_at = Set(Some(now_utc()));
                    }
                    if tracking.notes.is_some() {
                        active.notes = Set(tracking.notes.clone());
                    }
                    active.update(txn).await?;
                }
            }
        }

        Ok(())
    }
}

async fn current_grade(
    txn: &DatabaseTransaction,
    student_id: Uuid,
    subject_id: Uuid,
) -> Result<Option<f32>, AcademyError> {
    let tracking = subject_tracking::Entity::find()
        .filter(subject_tracking::Column::StudentId.eq(student_id))
        .filter(subject_tracking::Column::SubjectId.eq(subject_id))
        .one(txn)
        .await?;
    Ok(tracking.and_then(|t| t.grade))
}
