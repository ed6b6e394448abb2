use crate::entities::{
    academic_history, plans, session_enrollments, sessions, students, subjects,
};
use crate::error::AcademyError;
use crate::services::campus::CampusService;
use crate::services::curriculum::CurriculumService;
use crate::services::enrollment::EnrollmentService;
use crate::services::now_utc;
use crate::services::progression::ProgressionService;
use crate::services::settings::SettingsService;
use crate::services::student::StudentService;
use crate::services::sync::{AttendanceMark, SyncService};
use models::schedule;
use models::states::{
    AttendanceStatus, BookingOrigin, SessionEnrollmentState, SessionState,
};
use sea_orm::prelude::DateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

pub struct BookSession {
    pub session_id: Uuid,
    pub student_id: Uuid,
    pub origin: BookingOrigin,
    /// Coordinators may push a booking past an unmet prerequisite gate,
    /// with a reason.
    pub actor_is_coordinator: bool,
    pub override_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionRoster {
    pub pending: u64,
    pub confirmed: u64,
    pub attended: u64,
    pub absent: u64,
    pub cancelled: u64,
}

pub struct BookingService;

impl BookingService {
    /// Books a student into a session after the full admission gate: day
    /// allowed, window honored, advance-time respected, prerequisites met
    /// (or overridden), capacity available, subject not already completed.
    pub async fn book(
        db: &DatabaseConnection,
        cmd: BookSession,
    ) -> Result<session_enrollments::Model, AcademyError> {
        let txn = db.begin().await?;

        let session = sessions::Entity::find_by_id(cmd.session_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("session"))?;
        let student = students::Entity::find_by_id(cmd.student_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("student"))?;

        let duplicate = session_enrollments::Entity::find()
            .filter(session_enrollments::Column::SessionId.eq(session.id))
            .filter(session_enrollments::Column::StudentId.eq(student.id))
            .all(&txn)
            .await?
            .into_iter()
            .any(|row| row.state.is_live());
        if duplicate {
            return Err(AcademyError::DuplicateEnrollment);
        }

        let effective_subject = Self::check_admission(
            &txn,
            &session,
            &student,
            now_utc(),
            cmd.actor_is_coordinator,
            cmd.override_reason.as_deref(),
        )
        .await?;

        let effective_unit_number = effective_unit(&session, effective_subject.as_ref());
        let booking = session_enrollments::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(session.id),
            student_id: Set(student.id),
            state: Set(SessionEnrollmentState::Pending),
            origin: Set(cmd.origin),
            effective_subject_id: Set(effective_subject.as_ref().map(|s| s.id)),
            effective_unit_number: Set(effective_unit_number),
            confirmed_at: Set(None),
            attendance_marked_at: Set(None),
            created_at: Set(now_utc()),
            updated_at: Set(now_utc()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(booking)
    }

    /// Confirms a pending booking. Re-resolves the effective subject,
    /// refuses subjects the student already completed and full sessions.
    /// The first portal confirmation flips an `active` session to
    /// `with_enrollment`.
    pub async fn confirm(
        db: &DatabaseConnection,
        booking_id: Uuid,
    ) -> Result<session_enrollments::Model, AcademyError> {
        let txn = db.begin().await?;

        let booking = find_booking(&txn, booking_id).await?;
        if booking.state != SessionEnrollmentState::Pending {
            return Err(AcademyError::Validation(format!(
                "only pending bookings can be confirmed, found {}",
                booking.state
            )));
        }
        let session = sessions::Entity::find_by_id(booking.session_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("session"))?;
        if !session.state.accepts_bookings() {
            return Err(AcademyError::Validation(format!(
                "session {} no longer accepts bookings",
                session.code
            )));
        }

        let effective_subject =
            Self::resolve_effective_subject(&txn, &session, booking.student_id).await?;
        if let Some(subject) = &effective_subject {
            let attended_before = academic_history::Entity::find()
                .filter(academic_history::Column::StudentId.eq(booking.student_id))
                .filter(academic_history::Column::SubjectId.eq(subject.id))
                .filter(academic_history::Column::AttendanceStatus.eq(AttendanceStatus::Attended))
                .count(&txn)
                .await?;
            if attended_before > 0 {
                return Err(AcademyError::AlreadyCompleted {
                    subject: subject.name.clone(),
                });
            }
        }

        let confirmed = confirmed_count(&txn, session.id).await?;
        if confirmed >= session.max_capacity as u64 {
            return Err(AcademyError::SessionFull {
                capacity: session.max_capacity,
            });
        }

        let origin = booking.origin;
        let effective_unit_number = effective_unit(&session, effective_subject.as_ref());
        let mut active: session_enrollments::ActiveModel = booking.into();
        active.state = Set(SessionEnrollmentState::Confirmed);
        if let Some(subject) = &effective_subject {
            active.effective_subject_id = Set(Some(subject.id));
            active.effective_unit_number = Set(effective_unit_number);
        }
        active.confirmed_at = Set(Some(now_utc()));
        active.updated_at = Set(now_utc());
        let booking = active.update(&txn).await?;

        if origin == BookingOrigin::Portal && session.state == SessionState::Active {
            let mut active: sessions::ActiveModel = session.into();
            active.state = Set(SessionState::WithEnrollment);
            active.updated_at = Set(now_utc());
            active.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(booking)
    }

    /// Cancels a booking. Attendance already recorded is final; portal
    /// cancellations must respect the advance-time policy.
    pub async fn cancel(
        db: &DatabaseConnection,
        booking_id: Uuid,
        by_staff: bool,
    ) -> Result<session_enrollments::Model, AcademyError> {
        let txn = db.begin().await?;

        let booking = find_booking(&txn, booking_id).await?;
        if booking.state == SessionEnrollmentState::Cancelled {
            return Err(AcademyError::Validation(
                "booking is already cancelled".to_string(),
            ));
        }
        if booking.state == SessionEnrollmentState::Attended {
            return Err(AcademyError::Validation(
                "cannot cancel a booking the student already attended".to_string(),
            ));
        }

        let session = sessions::Entity::find_by_id(booking.session_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("session"))?;
        let now = now_utc();
        if !by_staff && now < session.starts_at {
            let min_minutes = SettingsService::min_minutes_to_cancel(&txn).await?;
            if schedule::minutes_until(now, session.starts_at) < min_minutes {
                return Err(AcademyError::Validation(format!(
                    "bookings must be cancelled at least {min_minutes} minutes before start"
                )));
            }
        }

        let mut active: session_enrollments::ActiveModel = booking.into();
        active.state = Set(SessionEnrollmentState::Cancelled);
        active.updated_at = Set(now_utc());
        let booking = active.update(&txn).await?;
        txn.commit().await?;
        Ok(booking)
    }

    /// Returns a cancelled booking to pending, while seats remain.
    pub async fn reopen(
        db: &DatabaseConnection,
        booking_id: Uuid,
    ) -> Result<session_enrollments::Model, AcademyError> {
        let txn = db.begin().await?;

        let booking = find_booking(&txn, booking_id).await?;
        if booking.state != SessionEnrollmentState::Cancelled {
            return Err(AcademyError::Validation(
                "only cancelled bookings can be reopened".to_string(),
            ));
        }
        let session = sessions::Entity::find_by_id(booking.session_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("session"))?;
        if !session.state.accepts_bookings() {
            return Err(AcademyError::Validation(format!(
                "session {} no longer accepts bookings",
                session.code
            )));
        }
        let confirmed = confirmed_count(&txn, session.id).await?;
        if confirmed >= session.max_capacity as u64 {
            return Err(AcademyError::SessionFull {
                capacity: session.max_capacity,
            });
        }

        let mut active: session_enrollments::ActiveModel = booking.into();
        active.state = Set(SessionEnrollmentState::Pending);
        active.updated_at = Set(now_utc());
        let booking = active.update(&txn).await?;
        txn.commit().await?;
        Ok(booking)
    }

    /// Coach records the student as attended. One-way: once attended, the
    /// mark is final.
    pub async fn mark_attended(
        db: &DatabaseConnection,
        booking_id: Uuid,
        actor: Option<String>,
    ) -> Result<(), AcademyError> {
        SyncService::apply_attendance(db, booking_id, AttendanceMark::Attended, actor).await
    }

    pub async fn mark_absent(
        db: &DatabaseConnection,
        booking_id: Uuid,
        actor: Option<String>,
    ) -> Result<(), AcademyError> {
        SyncService::apply_attendance(db, booking_id, AttendanceMark::Absent, actor).await
    }

    /// Confirmed/attended/absent counts for a session's roster view.
    pub async fn roster<C: ConnectionTrait>(
        conn: &C,
        session_id: Uuid,
    ) -> Result<SessionRoster, AcademyError> {
        let rows = session_enrollments::Entity::find()
            .filter(session_enrollments::Column::SessionId.eq(session_id))
            .all(conn)
            .await?;

        let mut roster = SessionRoster {
            pending: 0,
            confirmed: 0,
            attended: 0,
            absent: 0,
            cancelled: 0,
        };
        for row in rows {
            match row.state {
                SessionEnrollmentState::Pending => roster.pending += 1,
                SessionEnrollmentState::Confirmed => roster.confirmed += 1,
                SessionEnrollmentState::Attended => roster.attended += 1,
                SessionEnrollmentState::Absent => roster.absent += 1,
                SessionEnrollmentState::Cancelled => roster.cancelled += 1,
            }
        }
        Ok(roster)
    }

    /// The admission gate evaluated over all published future sessions:
    /// everything the student could book right now.
    pub async fn bookable_sessions(
        db: &DatabaseConnection,
        student_id: Uuid,
    ) -> Result<Vec<sessions::Model>, AcademyError> {
        let student = students::Entity::find_by_id(student_id)
            .one(db)
            .await?
            .ok_or(AcademyError::NotFound("student"))?;

        let now = now_utc();
        let candidates = sessions::Entity::find()
            .filter(sessions::Column::Published.eq(true))
            .filter(sessions::Column::StartsAt.gt(now))
            .order_by_asc(sessions::Column::StartsAt)
            .all(db)
            .await?;

        let mut bookable = Vec::new();
        for session in candidates {
            if !session.state.accepts_bookings() {
                continue;
            }
            if Self::check_admission(db, &session, &student, now, false, None)
                .await
                .is_ok()
            {
                bookable.push(session);
            }
        }
        Ok(bookable)
    }

    /// The full admission gate. Returns the resolved effective subject so
    /// callers can persist it on the booking.
    pub async fn check_admission<C: ConnectionTrait>(
        conn: &C,
        session: &sessions::Model,
        student: &students::Model,
        now: DateTime,
        actor_is_coordinator: bool,
        override_reason: Option<&str>,
    ) -> Result<Option<subjects::Model>, AcademyError> {
        if !session.published || !session.state.accepts_bookings() {
            return Err(AcademyError::Validation(format!(
                "session {} is not open for booking",
                session.code
            )));
        }

        if !StudentService::may_book(conn, student).await? {
            return Err(AcademyError::Validation(format!(
                "student {} may not book sessions in their current profile state",
                student.code
            )));
        }

        let min_minutes = SettingsService::min_minutes_to_book(conn).await?;
        if schedule::minutes_until(now, session.starts_at) < min_minutes {
            return Err(AcademyError::Validation(format!(
                "sessions must be booked at least {min_minutes} minutes before start"
            )));
        }

        CampusService::validate_session_window(
            conn,
            session.campus_id,
            session.starts_at,
            session.ends_at,
        )
        .await?;

        let effective_subject = Self::resolve_effective_subject(conn, session, student.id).await?;

        if let Some(subject) = &effective_subject {
            let outcome =
                ProgressionService::check_prerequisites(conn, subject, student.id, now).await?;
            if !outcome.is_satisfied() {
                let overridden = actor_is_coordinator
                    && override_reason.is_some_and(|r| !r.trim().is_empty());
                if overridden {
                    log::warn!(
                        "prerequisite override for student {} on subject {}: {}",
                        student.code,
                        subject.code,
                        outcome.describe()
                    );
                } else {
                    return Err(AcademyError::PrerequisitesUnmet { outcome });
                }
            }

            let attended_before = academic_history::Entity::find()
                .filter(academic_history::Column::StudentId.eq(student.id))
                .filter(academic_history::Column::SubjectId.eq(subject.id))
                .filter(academic_history::Column::AttendanceStatus.eq(AttendanceStatus::Attended))
                .count(conn)
                .await?;
            if attended_before > 0 {
                return Err(AcademyError::AlreadyCompleted {
                    subject: subject.name.clone(),
                });
            }
        }

        let confirmed = confirmed_count(conn, session.id).await?;
        if confirmed >= session.max_capacity as u64 {
            return Err(AcademyError::SessionFull {
                capacity: session.max_capacity,
            });
        }

        Ok(effective_subject)
    }

    /// Resolves the subject a booking counts for. Pool sessions pick the
    /// first subject of the student's current level they have not attended
    /// yet (by sequence, code); with everything attended the first of the
    /// level is the fallback, and without a level match the first of the
    /// pool. Plain sessions use their fixed subject.
    pub async fn resolve_effective_subject<C: ConnectionTrait>(
        conn: &C,
        session: &sessions::Model,
        student_id: Uuid,
    ) -> Result<Option<subjects::Model>, AcademyError> {
        let Some(pool_id) = session.elective_pool_id else {
            return Ok(match session.subject_id {
                Some(subject_id) => subjects::Entity::find_by_id(subject_id).one(conn).await?,
                None => None,
            });
        };

        let pool = CurriculumService::pool_subjects(conn, pool_id).await?;
        if pool.is_empty() {
            return Ok(None);
        }

        let current_level_id = EnrollmentService::active_enrollment_for_student(conn, student_id)
            .await?
            .and_then(|e| e.current_level_id);

        let level_pool: Vec<&subjects::Model> = match current_level_id {
            Some(level_id) => pool
                .iter()
                .filter(|s| s.level_id == Some(level_id))
                .collect(),
            None => Vec::new(),
        };

        if !level_pool.is_empty() {
            let attended = ProgressionService::completed_subject_ids(conn, student_id).await?;
            let next_pending = level_pool
                .iter()
                .find(|s| !attended.contains(&s.id))
                .copied();
            if let Some(subject) = next_pending {
                return Ok(Some(subject.clone()));
            }
            log::warn!(
                "student {student_id} attended every pool subject of their level; falling back to the first"
            );
            return Ok(level_pool.first().map(|s| (*s).clone()));
        }

        log::warn!(
            "no pool subject matches the current level of student {student_id}; using the first of the pool"
        );
        Ok(pool.into_iter().next())
    }

    /// Writes an academic-history row with the curriculum context
    /// denormalized from the student's active enrollment and the session.
    pub(crate) async fn insert_history_row<C: ConnectionTrait>(
        conn: &C,
        student: &students::Model,
        session: &sessions::Model,
        subject_id: Uuid,
        status: AttendanceStatus,
    ) -> Result<academic_history::Model, AcademyError> {
        let enrollment =
            EnrollmentService::active_enrollment_for_student(conn, student.id).await?;
        let plan = match enrollment.as_ref().map(|e| e.plan_id) {
            Some(plan_id) => plans::Entity::find_by_id(plan_id).one(conn).await?,
            None => None,
        };

        let row = academic_history::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student.id),
            session_id: Set(Some(session.id)),
            subject_id: Set(subject_id),
            program_id: Set(plan.as_ref().map(|p| p.program_id)),
            plan_id: Set(plan.as_ref().map(|p| p.id)),
            phase_id: Set(enrollment.as_ref().and_then(|e| e.current_phase_id)),
            level_id: Set(enrollment.as_ref().and_then(|e| e.current_level_id)),
            campus_id: Set(Some(session.campus_id)),
            teacher_id: Set(session.teacher_id),
            delivery_mode: Set(Some(session.delivery_mode)),
            session_starts_at: Set(Some(session.starts_at)),
            attendance_status: Set(status),
            attended: Set(status.attended_flag()),
            grade: Set(None),
            notes: Set(None),
            attendance_marked_at: Set(Some(now_utc())),
            grade_marked_at: Set(None),
            created_at: Set(now_utc()),
            updated_at: Set(now_utc()),
        }
        .insert(conn)
        .await?;
        Ok(row)
    }
}

async fn find_booking<C: ConnectionTrait>(
    conn: &C,
    booking_id: Uuid,
) -> Result<session_enrollments::Model, AcademyError> {
    session_enrollments::Entity::find_by_id(booking_id)
        .one(conn)
        .await?
        .ok_or(AcademyError::NotFound("session enrollment"))
}

async fn confirmed_count<C: ConnectionTrait>(
    conn: &C,
    session_id: Uuid,
) -> Result<u64, AcademyError> {
    Ok(session_enrollments::Entity::find()
        .filter(session_enrollments::Column::SessionId.eq(session_id))
        .filter(session_enrollments::Column::State.is_in([
            SessionEnrollmentState::Confirmed,
            SessionEnrollmentState::Attended,
            SessionEnrollmentState::Absent,
        ]))
        .count(conn)
        .await?)
}

fn effective_unit(
    session: &sessions::Model,
    subject: Option<&subjects::Model>,
) -> Option<i32> {
    if session.elective_pool_id.is_some() {
        // Pool sessions reference the top of their audience range.
        session
            .audience_unit_to
            .or_else(|| subject.and_then(|s| s.unit_number))
    } else {
        subject.and_then(|s| s.unit_number.or(s.unit_block_end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::category::SubjectCategory;
    use models::states::{DeliveryMode, SessionState};

    fn session_model(pool: Option<Uuid>, unit_to: Option<i32>) -> sessions::Model {
        sessions::Model {
            id: Uuid::new_v4(),
            code: "SE-1".to_string(),
            subject_id: None,
            elective_pool_id: pool,
            campus_id: Uuid::new_v4(),
            room_id: None,
            teacher_id: None,
            coach_id: None,
            starts_at: now_utc(),
            ends_at: now_utc(),
            delivery_mode: DeliveryMode::Virtual,
            max_capacity: 10,
            state: SessionState::Active,
            published: true,
            audience_unit_from: unit_to.map(|_| 1),
            audience_unit_to: unit_to,
            cancellation_reason: None,
            inactive_flagged_at: None,
            created_at: now_utc(),
            updated_at: now_utc(),
        }
    }

    fn subject_model(unit: Option<i32>, block_end: Option<i32>) -> subjects::Model {
        subjects::Model {
            id: Uuid::new_v4(),
            level_id: None,
            code: "A-1".to_string(),
            name: "Subject".to_string(),
            category: SubjectCategory::Other,
            sequence: 1,
            unit_number: unit,
            skill_slot: None,
            unit_block_start: block_end.map(|_| 1),
            unit_block_end: block_end,
            is_prerequisite: false,
            evaluable: true,
            created_at: now_utc(),
            updated_at: now_utc(),
        }
    }

    fn booking_row(session_id: Uuid, state: SessionEnrollmentState) -> session_enrollments::Model {
        session_enrollments::Model {
            id: Uuid::new_v4(),
            session_id,
            student_id: Uuid::new_v4(),
            state,
            origin: BookingOrigin::Portal,
            effective_subject_id: None,
            effective_unit_number: None,
            confirmed_at: None,
            attendance_marked_at: None,
            created_at: now_utc(),
            updated_at: now_utc(),
        }
    }

    #[tokio::test]
    async fn test_roster_counts_by_state() {
        use sea_orm::{DatabaseBackend, MockDatabase};

        let session_id = Uuid::new_v4();
        let rows = vec![
            booking_row(session_id, SessionEnrollmentState::Pending),
            booking_row(session_id, SessionEnrollmentState::Confirmed),
            booking_row(session_id, SessionEnrollmentState::Confirmed),
            booking_row(session_id, SessionEnrollmentState::Attended),
            booking_row(session_id, SessionEnrollmentState::Absent),
            booking_row(session_id, SessionEnrollmentState::Cancelled),
        ];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows])
            .into_connection();

        let roster = BookingService::roster(&db, session_id).await.unwrap();
        assert_eq!(roster.pending, 1);
        assert_eq!(roster.confirmed, 2);
        assert_eq!(roster.attended, 1);
        assert_eq!(roster.absent, 1);
        assert_eq!(roster.cancelled, 1);
    }

    #[test]
    fn test_effective_unit_for_pool_sessions() {
        let session = session_model(Some(Uuid::new_v4()), Some(4));
        let subject = subject_model(Some(2), None);
        assert_eq!(effective_unit(&session, Some(&subject)), Some(4));
    }

    #[test]
    fn test_effective_unit_for_plain_sessions() {
        let session = session_model(None, None);
        assert_eq!(
            effective_unit(&session, Some(&subject_model(Some(2), None))),
            Some(2)
        );
        // Oral tests fall back to the end of their unit block.
        assert_eq!(
            effective_unit(&session, Some(&subject_model(None, Some(8)))),
            Some(8)
        );
        assert_eq!(effective_unit(&session, None), None);
    }
}
