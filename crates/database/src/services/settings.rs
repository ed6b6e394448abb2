use crate::entities::app_settings;
use crate::error::AcademyError;
use crate::services::now_utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectionTrait, EntityTrait};

/// Minimum advance minutes between "now" and a session's start for booking.
pub const MIN_MINUTES_TO_BOOK: (&str, i64) = ("min_minutes_to_book", 10);
/// Same, for cancelling a booking.
pub const MIN_MINUTES_TO_CANCEL: (&str, i64) = ("min_minutes_to_cancel", 10);
/// Days of inactivity after which courtesy-plan enrollments auto-cancel.
pub const COURTESY_INACTIVITY_CANCEL_DAYS: (&str, i64) = ("courtesy_inactivity_cancel_days", 21);
/// Days without activity before a session is flagged inactive.
pub const INACTIVITY_DAYS: (&str, i64) = ("inactivity_days", 10);
/// Minimum passing grade for oral tests (pass/fail comparison only).
pub const ORAL_TEST_MIN_GRADE: (&str, i64) = ("oral_test_min_grade", 70);

pub struct SettingsService;

impl SettingsService {
    /// Reads an integer setting, falling back to its default when the key
    /// is absent, unparsable, or negative.
    pub async fn get_int<C: ConnectionTrait>(
        conn: &C,
        key_default: (&str, i64),
    ) -> Result<i64, AcademyError> {
        let (key, default) = key_default;
        let row = app_settings::Entity::find_by_id(key.to_string())
            .one(conn)
            .await?;

        Ok(match row {
            Some(setting) => match setting.value.trim().parse::<i64>() {
                Ok(value) if value >= 0 => value,
                Ok(value) => {
                    log::warn!("setting {key} has negative value {value}; using default {default}");
                    default
                }
                Err(_) => {
                    log::warn!(
                        "setting {key} has unparsable value '{}'; using default {default}",
                        setting.value
                    );
                    default
                }
            },
            None => default,
        })
    }

    pub async fn set<C: ConnectionTrait>(
        conn: &C,
        key: &str,
        value: &str,
    ) -> Result<(), AcademyError> {
        let existing = app_settings::Entity::find_by_id(key.to_string())
            .one(conn)
            .await?;
        match existing {
            Some(row) => {
                let mut active: app_settings::ActiveModel = row.into();
                active.value = Set(value.to_string());
                active.updated_at = Set(now_utc());
                active.update(conn).await?;
            }
            None => {
                app_settings::ActiveModel {
                    key: Set(key.to_string()),
                    value: Set(value.to_string()),
                    updated_at: Set(now_utc()),
                }
                .insert(conn)
                .await?;
            }
        }
        Ok(())
    }

    pub async fn min_minutes_to_book<C: ConnectionTrait>(conn: &C) -> Result<i64, AcademyError> {
        Self::get_int(conn, MIN_MINUTES_TO_BOOK).await
    }

    pub async fn min_minutes_to_cancel<C: ConnectionTrait>(conn: &C) -> Result<i64, AcademyError> {
        Self::get_int(conn, MIN_MINUTES_TO_CANCEL).await
    }

    pub async fn courtesy_inactivity_cancel_days<C: ConnectionTrait>(
        conn: &C,
    ) -> Result<i64, AcademyError> {
        Self::get_int(conn, COURTESY_INACTIVITY_CANCEL_DAYS).await
    }

    pub async fn inactivity_days<C: ConnectionTrait>(conn: &C) -> Result<i64, AcademyError> {
        Self::get_int(conn, INACTIVITY_DAYS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn setting(key: &str, value: &str) -> app_settings::Model {
        app_settings::Model {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: now_utc(),
        }
    }

    #[tokio::test]
    async fn test_get_int_reads_stored_value() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![setting("min_minutes_to_book", "25")]])
            .into_connection();
        assert_eq!(SettingsService::min_minutes_to_book(&db).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_get_int_defaults_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<app_settings::Model>::new()])
            .into_connection();
        assert_eq!(SettingsService::min_minutes_to_book(&db).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_get_int_falls_back_on_bad_values() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![setting("min_minutes_to_cancel", "-5")],
                vec![setting("inactivity_days", "soon")],
            ])
            .into_connection();
        assert_eq!(SettingsService::min_minutes_to_cancel(&db).await.unwrap(), 10);
        assert_eq!(SettingsService::inactivity_days(&db).await.unwrap(), 10);
    }
}
