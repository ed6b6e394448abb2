use crate::entities::{
    academic_history, elective_pools, rooms, session_enrollments, sessions, students, subjects,
};
use crate::error::AcademyError;
use crate::services::booking::BookingService;
use crate::services::campus::CampusService;
use crate::services::{next_table_code, now_utc};
use models::states::{AttendanceStatus, DeliveryMode, SessionEnrollmentState, SessionState};
use sea_orm::prelude::DateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

pub struct CreateSession {
    /// Fixed subject, or None for an elective-pool session.
    pub subject_id: Option<Uuid>,
    pub elective_pool_id: Option<Uuid>,
    pub campus_id: Uuid,
    pub room_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub coach_id: Option<Uuid>,
    pub starts_at: DateTime,
    pub ends_at: DateTime,
    pub delivery_mode: DeliveryMode,
    pub max_capacity: i32,
    pub audience_unit_from: Option<i32>,
    pub audience_unit_to: Option<i32>,
}

pub struct RescheduleSession {
    pub starts_at: DateTime,
    pub ends_at: DateTime,
    pub room_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub coach_id: Option<Uuid>,
}

/// Candidate window/resources checked against other live sessions.
struct ConflictProbe {
    session_id: Option<Uuid>,
    starts_at: DateTime,
    ends_at: DateTime,
    teacher_id: Option<Uuid>,
    coach_id: Option<Uuid>,
    room_id: Option<Uuid>,
}

pub struct SessionService;

impl SessionService {
    pub async fn create_session(
        db: &DatabaseConnection,
        cmd: CreateSession,
    ) -> Result<sessions::Model, AcademyError> {
        validate_shape(&cmd)?;

        let txn = db.begin().await?;

        if let Some(subject_id) = cmd.subject_id {
            subjects::Entity::find_by_id(subject_id)
                .one(&txn)
                .await?
                .ok_or(AcademyError::NotFound("subject"))?;
        }
        if let Some(pool_id) = cmd.elective_pool_id {
            elective_pools::Entity::find_by_id(pool_id)
                .one(&txn)
                .await?
                .ok_or(AcademyError::NotFound("elective pool"))?;
        }
        if let Some(room_id) = cmd.room_id {
            let room = rooms::Entity::find_by_id(room_id)
                .one(&txn)
                .await?
                .ok_or(AcademyError::NotFound("room"))?;
            if room.campus_id != cmd.campus_id {
                return Err(AcademyError::Validation(format!(
                    "room {} belongs to a different campus",
                    room.code
                )));
            }
            let room_capacity = room
                .modality
                .effective_capacity(room.capacity, room.virtual_capacity);
            if cmd.max_capacity > room_capacity {
                return Err(AcademyError::Validation(format!(
                    "session capacity {} exceeds room {} capacity {room_capacity}",
                    cmd.max_capacity, room.code
                )));
            }
        }

        CampusService::validate_session_window(&txn, cmd.campus_id, cmd.starts_at, cmd.ends_at)
            .await?;
        assert_no_resource_conflict(
            &txn,
            &ConflictProbe {
                session_id: None,
                starts_at: cmd.starts_at,
                ends_at: cmd.ends_at,
                teacher_id: cmd.teacher_id,
                coach_id: cmd.coach_id,
                room_id: cmd.room_id,
            },
        )
        .await?;

        let code = next_table_code::<sessions::Entity, _>(&txn, "SE-").await?;
        let session = sessions::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            subject_id: Set(cmd.subject_id),
            elective_pool_id: Set(cmd.elective_pool_id),
            campus_id: Set(cmd.campus_id),
            room_id: Set(cmd.room_id),
            teacher_id: Set(cmd.teacher_id),
            coach_id: Set(cmd.coach_id),
            starts_at: Set(cmd.starts_at),
            ends_at: Set(cmd.ends_at),
            delivery_mode: Set(cmd.delivery_mode),
            max_capacity: Set(cmd.max_capacity),
            state: Set(SessionState::Draft),
            published: Set(false),
            audience_unit_from: Set(cmd.audience_unit_from),
            audience_unit_to: Set(cmd.audience_unit_to),
            cancellation_reason: Set(None),
            inactive_flagged_at: Set(None),
            created_at: Set(now_utc()),
            updated_at: Set(now_utc()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(session)
    }

    /// Moves a session's window or resources, re-running window validation
    /// and conflict detection.
    pub async fn reschedule(
        db: &DatabaseConnection,
        session_id: Uuid,
        cmd: RescheduleSession,
    ) -> Result<sessions::Model, AcademyError> {
        if cmd.starts_at >= cmd.ends_at {
            return Err(AcademyError::Validation(
                "session must start before it ends".to_string(),
            ));
        }

        let txn = db.begin().await?;
        let session = find_session(&txn, session_id).await?;
        if matches!(
            session.state,
            SessionState::InProgress | SessionState::Done | SessionState::Cancelled
        ) {
            return Err(AcademyError::Validation(format!(
                "cannot reschedule a session in state {}",
                session.state
            )));
        }

        CampusService::validate_session_window(&txn, session.campus_id, cmd.starts_at, cmd.ends_at)
            .await?;
        assert_no_resource_conflict(
            &txn,
            &ConflictProbe {
                session_id: Some(session.id),
                starts_at: cmd.starts_at,
                ends_at: cmd.ends_at,
                teacher_id: cmd.teacher_id,
                coach_id: cmd.coach_id,
                room_id: cmd.room_id,
            },
        )
        .await?;

        let mut active: sessions::ActiveModel = session.into();
        active.starts_at = Set(cmd.starts_at);
        active.ends_at = Set(cmd.ends_at);
        active.room_id = Set(cmd.room_id);
        active.teacher_id = Set(cmd.teacher_id);
        active.coach_id = Set(cmd.coach_id);
        active.updated_at = Set(now_utc());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    pub async fn plan(
        db: &DatabaseConnection,
        session_id: Uuid,
    ) -> Result<sessions::Model, AcademyError> {
        let txn = db.begin().await?;
        let session = find_session(&txn, session_id).await?;
        if session.state != SessionState::Draft {
            return Err(AcademyError::InvalidTransition {
                from: session.state.to_string(),
                to: SessionState::Planned.to_string(),
            });
        }
        let updated = set_state(&txn, session, SessionState::Planned).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Publishing re-validates the window against the campus and leaves
    /// the delivery mode exactly as stored.
    pub async fn publish(
        db: &DatabaseConnection,
        session_id: Uuid,
    ) -> Result<sessions::Model, AcademyError> {
        let txn = db.begin().await?;
        let session = find_session(&txn, session_id).await?;
        if session.state != SessionState::Planned {
            return Err(AcademyError::InvalidTransition {
                from: session.state.to_string(),
                to: SessionState::Active.to_string(),
            });
        }

        CampusService::validate_session_window(
            &txn,
            session.campus_id,
            session.starts_at,
            session.ends_at,
        )
        .await?;

        let mut active: sessions::ActiveModel = session.into();
        active.state = Set(SessionState::Active);
        active.published = Set(true);
        active.updated_at = Set(now_utc());
        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    pub async fn unpublish(
        db: &DatabaseConnection,
        session_id: Uuid,
    ) -> Result<sessions::Model, AcademyError> {
        let txn = db.begin().await?;
        let session = find_session(&txn, session_id).await?;
        if session.state != SessionState::Active {
            return Err(AcademyError::InvalidTransition {
                from: session.state.to_string(),
                to: SessionState::Planned.to_string(),
            });
        }
        let mut active: sessions::ActiveModel = session.into();
        active.state = Set(SessionState::Planned);
        active.published = Set(false);
        active.updated_at = Set(now_utc());
        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// The coach starts the class. Requires content (subject or pool), a
    /// room for non-virtual delivery, and at least a teacher or coach.
    pub async fn start(
        db: &DatabaseConnection,
        session_id: Uuid,
    ) -> Result<sessions::Model, AcademyError> {
        let txn = db.begin().await?;
        let session = find_session(&txn, session_id).await?;
        if !session.state.can_start() {
            return Err(AcademyError::InvalidTransition {
                from: session.state.to_string(),
                to: SessionState::InProgress.to_string(),
            });
        }
        if session.subject_id.is_none() && session.elective_pool_id.is_none() {
            return Err(AcademyError::Validation(
                "session needs a subject or an elective pool before starting".to_string(),
            ));
        }
        if session.delivery_mode.requires_room() && session.room_id.is_none() {
            return Err(AcademyError::Validation(
                "non-virtual sessions need a room before starting".to_string(),
            ));
        }
        if session.teacher_id.is_none() && session.coach_id.is_none() {
            return Err(AcademyError::Validation(
                "assign a teacher or a coach before starting".to_string(),
            ));
        }

        let updated = set_state(&txn, session, SessionState::InProgress).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// The coach closes the class. Every live booking without a history row
    /// gets a pending one so the roster survives into the history ledger;
    /// the backfill is idempotent.
    pub async fn finish(
        db: &DatabaseConnection,
        session_id: Uuid,
    ) -> Result<sessions::Model, AcademyError> {
        let txn = db.begin().await?;
        let session = find_session(&txn, session_id).await?;
        if session.state != SessionState::InProgress {
            return Err(AcademyError::InvalidTransition {
                from: session.state.to_string(),
                to: SessionState::Done.to_string(),
            });
        }

        let updated = set_state(&txn, session.clone(), SessionState::Done).await?;

        let bookings = session_enrollments::Entity::find()
            .filter(session_enrollments::Column::SessionId.eq(session.id))
            .all(&txn)
            .await?;
        for booking in bookings {
            if !booking.state.is_live() {
                continue;
            }
            let existing = academic_history::Entity::find()
                .filter(academic_history::Column::StudentId.eq(booking.student_id))
                .filter(academic_history::Column::SessionId.eq(session.id))
                .one(&txn)
                .await?;
            if existing.is_some() {
                continue;
            }

            let status = match booking.state {
                SessionEnrollmentState::Attended => AttendanceStatus::Attended,
                SessionEnrollmentState::Absent => AttendanceStatus::Absent,
                _ => AttendanceStatus::Pending,
            };
            let effective_subject_id = match booking.effective_subject_id.or(session.subject_id) {
                Some(id) => id,
                None => {
                    let resolved =
                        BookingService::resolve_effective_subject(&txn, &session, booking.student_id)
                            .await?;
                    match resolved {
                        Some(subject) => subject.id,
                        None => continue,
                    }
                }
            };

            let student = students::Entity::find_by_id(booking.student_id)
                .one(&txn)
                .await?
                .ok_or(AcademyError::NotFound("student"))?;
            BookingService::insert_history_row(
                &txn,
                &student,
                &session,
                effective_subject_id,
                status,
            )
            .await?;
        }

        txn.commit().await?;
        Ok(updated)
    }

    /// Cancellation is reachable from any non-done state and always needs a
    /// reason.
    pub async fn cancel(
        db: &DatabaseConnection,
        session_id: Uuid,
        reason: &str,
    ) -> Result<sessions::Model, AcademyError> {
        if reason.trim().is_empty() {
            return Err(AcademyError::MissingReason);
        }

        let txn = db.begin().await?;
        let session = find_session(&txn, session_id).await?;
        if !session.state.can_cancel() {
            return Err(AcademyError::InvalidTransition {
                from: session.state.to_string(),
                to: SessionState::Cancelled.to_string(),
            });
        }

        let mut active: sessions::ActiveModel = session.into();
        active.state = Set(SessionState::Cancelled);
        active.cancellation_reason = Set(Some(reason.trim().to_string()));
        active.updated_at = Set(now_utc());
        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }
}

async fn find_session(
    txn: &DatabaseTransaction,
    session_id: Uuid,
) -> Result<sessions::Model, AcademyError> {
    sessions::Entity::find_by_id(session_id)
        .one(txn)
        .await?
        .ok_or(AcademyError::NotFound("session"))
}

async fn set_state(
    txn: &DatabaseTransaction,
    session: sessions::Model,
    state: SessionState,
) -> Result<sessions::Model, AcademyError> {
    let mut active: sessions::ActiveModel = session.into();
    active.state = Set(state);
    active.updated_at = Set(now_utc());
    Ok(active.update(txn).await?)
}

fn validate_shape(cmd: &CreateSession) -> Result<(), AcademyError> {
    if cmd.subject_id.is_none() && cmd.elective_pool_id.is_none() {
        return Err(AcademyError::Validation(
            "session needs a subject or an elective pool".to_string(),
        ));
    }
    if cmd.starts_at >= cmd.ends_at {
        return Err(AcademyError::Validation(
            "session must start before it ends".to_string(),
        ));
    }
    if cmd.max_capacity < 1 {
        return Err(AcademyError::Validation(format!(
            "session capacity must be at least 1, got {}",
            cmd.max_capacity
        )));
    }
    match (cmd.audience_unit_from, cmd.audience_unit_to) {
        (None, None) => {}
        (Some(from), Some(to)) if from >= 1 && to >= from => {}
        _ => {
            return Err(AcademyError::Validation(
                "audience unit range must be a valid inclusive range".to_string(),
            ));
        }
    }
    if cmd.delivery_mode.requires_room() && cmd.room_id.is_none() {
        return Err(AcademyError::Validation(
            "non-virtual sessions need a room".to_string(),
        ));
    }
    Ok(())
}

/// Rejects the probe when any other non-cancelled session overlaps in time
/// and shares a teacher, coach, or room. Overlap is strict:
/// `other.start < probe.end && other.end > probe.start`.
async fn assert_no_resource_conflict<C: ConnectionTrait>(
    conn: &C,
    probe: &ConflictProbe,
) -> Result<(), AcademyError> {
    let overlapping = sessions::Entity::find()
        .filter(sessions::Column::State.ne(SessionState::Cancelled))
        .filter(sessions::Column::StartsAt.lt(probe.ends_at))
        .filter(sessions::Column::EndsAt.gt(probe.starts_at))
        .all(conn)
        .await?;

    for other in overlapping {
        if probe.session_id == Some(other.id) {
            continue;
        }
        if probe.teacher_id.is_some() && probe.teacher_id == other.teacher_id {
            return Err(AcademyError::ResourceConflict {
                resource: "teacher".to_string(),
                conflicting: other.code,
            });
        }
        if probe.coach_id.is_some() && probe.coach_id == other.coach_id {
            return Err(AcademyError::ResourceConflict {
                resource: "coach".to_string(),
                conflicting: other.code,
            });
        }
        if probe.room_id.is_some() && probe.room_id == other.room_id {
            return Err(AcademyError::ResourceConflict {
                resource: "room".to_string(),
                conflicting: other.code,
            });
        }
    }
    Ok(())
}
