use crate::entities::{campus_hours, campuses, rooms};
use crate::error::AcademyError;
use crate::services::{next_table_code, now_utc};
use models::days::DaySet;
use models::schedule::{self, DayWindow, WindowViolation};
use models::states::{CampusKind, RoomModality};
use sea_orm::prelude::DateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};
use uuid::Uuid;

/// Longest default session a campus may configure, in minutes.
const MAX_DEFAULT_SESSION_MINUTES: i32 = 8 * 60;

pub struct DayHours {
    /// ISO weekday, 1=Monday .. 7=Sunday.
    pub weekday: i16,
    pub open_from: chrono::NaiveTime,
    pub open_until: chrono::NaiveTime,
}

pub struct CreateCampus {
    pub name: String,
    pub kind: CampusKind,
    pub allowed_days: DaySet,
    pub open_from: chrono::NaiveTime,
    pub open_until: chrono::NaiveTime,
    pub default_session_minutes: i32,
    pub default_start: chrono::NaiveTime,
    pub default_end: chrono::NaiveTime,
    /// Per-weekday overrides; days without an entry use the general window.
    pub hours: Vec<DayHours>,
}

pub struct CreateRoom {
    pub campus_id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub modality: RoomModality,
    pub virtual_capacity: i32,
    pub has_projector: bool,
    pub has_audio: bool,
}

pub struct CampusService;

impl CampusService {
    pub async fn create_campus(
        db: &DatabaseConnection,
        cmd: CreateCampus,
    ) -> Result<campuses::Model, AcademyError> {
        let general = DayWindow::new(cmd.open_from, cmd.open_until).ok_or_else(|| {
            AcademyError::Validation("campus open-hours window is inverted or empty".to_string())
        })?;
        if cmd.allowed_days.is_empty() {
            return Err(AcademyError::Validation(
                "at least one weekday must be allowed for scheduling".to_string(),
            ));
        }
        if cmd.default_session_minutes <= 0
            || cmd.default_session_minutes > MAX_DEFAULT_SESSION_MINUTES
        {
            return Err(AcademyError::Validation(format!(
                "default session duration must be between 1 and {MAX_DEFAULT_SESSION_MINUTES} minutes"
            )));
        }
        let defaults = DayWindow::new(cmd.default_start, cmd.default_end).ok_or_else(|| {
            AcademyError::Validation("campus default times are inverted or empty".to_string())
        })?;
        if !general.contains(defaults.start) || !general.contains(defaults.end) {
            return Err(AcademyError::Validation(
                "default session times must lie within the campus window".to_string(),
            ));
        }
        for hours in &cmd.hours {
            if !(1..=7).contains(&hours.weekday) {
                return Err(AcademyError::Validation(format!(
                    "weekday must be 1..=7, got {}",
                    hours.weekday
                )));
            }
            let window = DayWindow::new(hours.open_from, hours.open_until).ok_or_else(|| {
                AcademyError::Validation(format!(
                    "open-hours window for weekday {} is inverted or empty",
                    hours.weekday
                ))
            })?;
            // Per-day windows narrow the general one, never widen it.
            if !general.contains(window.start) || !general.contains(window.end) {
                return Err(AcademyError::Validation(format!(
                    "weekday {} window must lie within the general window",
                    hours.weekday
                )));
            }
        }

        let txn = db.begin().await?;
        let code = next_table_code::<campuses::Entity, _>(&txn, "CAM-").await?;
        let campus = campuses::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(cmd.name),
            kind: Set(cmd.kind),
            allowed_days: Set(cmd.allowed_days),
            open_from: Set(cmd.open_from),
            open_until: Set(cmd.open_until),
            default_session_minutes: Set(cmd.default_session_minutes),
            default_start: Set(cmd.default_start),
            default_end: Set(cmd.default_end),
            created_at: Set(now_utc()),
            updated_at: Set(now_utc()),
        }
        .insert(&txn)
        .await?;

        for hours in cmd.hours {
            campus_hours::ActiveModel {
                id: Set(Uuid::new_v4()),
                campus_id: Set(campus.id),
                weekday: Set(hours.weekday),
                open_from: Set(hours.open_from),
                open_until: Set(hours.open_until),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(campus)
    }

    pub async fn create_room(
        db: &DatabaseConnection,
        cmd: CreateRoom,
    ) -> Result<rooms::Model, AcademyError> {
        if cmd.capacity < 1 {
            return Err(AcademyError::Validation(format!(
                "room capacity must be at least 1, got {}",
                cmd.capacity
            )));
        }
        if cmd.virtual_capacity < 0 {
            return Err(AcademyError::Validation(
                "virtual capacity cannot be negative".to_string(),
            ));
        }
        if matches!(cmd.modality, RoomModality::Virtual | RoomModality::Hybrid)
            && cmd.virtual_capacity < 1
        {
            return Err(AcademyError::Validation(
                "virtual and hybrid rooms need a virtual capacity of at least 1".to_string(),
            ));
        }

        let txn = db.begin().await?;
        campuses::Entity::find_by_id(cmd.campus_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("campus"))?;

        let code = next_table_code::<rooms::Entity, _>(&txn, "R-").await?;
        let room = rooms::ActiveModel {
            id: Set(Uuid::new_v4()),
            campus_id: Set(cmd.campus_id),
            code: Set(code),
            name: Set(cmd.name),
            capacity: Set(cmd.capacity),
            modality: Set(cmd.modality),
            virtual_capacity: Set(cmd.virtual_capacity),
            has_projector: Set(cmd.has_projector),
            has_audio: Set(cmd.has_audio),
            created_at: Set(now_utc()),
            updated_at: Set(now_utc()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(room)
    }

    pub async fn is_day_allowed<C: ConnectionTrait>(
        conn: &C,
        campus_id: Uuid,
        weekday: u32,
    ) -> Result<bool, AcademyError> {
        let campus = campuses::Entity::find_by_id(campus_id)
            .one(conn)
            .await?
            .ok_or(AcademyError::NotFound("campus"))?;
        Ok(campus.allowed_days.allows_iso_weekday(weekday))
    }

    /// Effective open-hours window for a weekday: the per-day override when
    /// one exists, otherwise the general window.
    pub async fn day_window<C: ConnectionTrait>(
        conn: &C,
        campus: &campuses::Model,
        weekday: u32,
    ) -> Result<DayWindow, AcademyError> {
        let override_row = campus_hours::Entity::find()
            .filter(campus_hours::Column::CampusId.eq(campus.id))
            .filter(campus_hours::Column::Weekday.eq(weekday as i16))
            .one(conn)
            .await?;

        let window = match override_row {
            Some(hours) => DayWindow::new(hours.open_from, hours.open_until),
            None => DayWindow::new(campus.open_from, campus.open_until),
        };
        window.ok_or_else(|| {
            AcademyError::Validation(format!(
                "campus {} has an inverted window for weekday {weekday}",
                campus.code
            ))
        })
    }

    /// Validates a proposed session window against the campus's allowed days
    /// and effective open hours, all in campus-local time.
    pub async fn validate_session_window<C: ConnectionTrait>(
        conn: &C,
        campus_id: Uuid,
        start_utc: DateTime,
        end_utc: DateTime,
    ) -> Result<(), AcademyError> {
        let campus = campuses::Entity::find_by_id(campus_id)
            .one(conn)
            .await?
            .ok_or(AcademyError::NotFound("campus"))?;

        let weekday = schedule::campus_weekday(start_utc);
        let window = Self::day_window(conn, &campus, weekday).await?;

        schedule::validate_session_window(campus.allowed_days, window, start_utc, end_utc).map_err(
            |violation| match violation {
                WindowViolation::DayNotAllowed { weekday } => AcademyError::DayNotAllowed {
                    campus: campus.name.clone(),
                    weekday,
                },
                WindowViolation::StartOutsideWindow { local_start } => {
                    AcademyError::StartOutsideWindow {
                        local_start: schedule::hour_label(local_start),
                    }
                }
                WindowViolation::EndOutsideWindow { local_end } => AcademyError::EndOutsideWindow {
                    local_end: schedule::hour_label(local_end),
                },
            },
        )
    }
}
