use crate::entities::{enrollments, plans, session_enrollments, sessions};
use crate::error::AcademyError;
use crate::services::now_utc;
use crate::services::settings::SettingsService;
use chrono::Duration;
use models::states::{EnrollmentState, SessionState};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

/// Idempotent cron-style maintenance passes. Each run opens its own
/// transaction; re-running after a crash repeats no visible effect.
pub struct MaintenanceService;

impl MaintenanceService {
    /// Cancels courtesy-plan enrollments with no booking activity within
    /// the configured window. Returns how many were cancelled.
    pub async fn cancel_stale_courtesy_enrollments(
        db: &DatabaseConnection,
    ) -> Result<usize, AcademyError> {
        let txn = db.begin().await?;
        let cutoff_days = SettingsService::courtesy_inactivity_cancel_days(&txn).await?;
        let cutoff = now_utc() - Duration::days(cutoff_days);

        let active = enrollments::Entity::find()
            .filter(enrollments::Column::State.eq(EnrollmentState::Active))
            .find_also_related(plans::Entity)
            .all(&txn)
            .await?;

        let mut cancelled = 0;
        for (enrollment, plan) in active {
            if !plan.is_some_and(|p| p.is_courtesy) {
                continue;
            }

            let last_booking = session_enrollments::Entity::find()
                .filter(session_enrollments::Column::StudentId.eq(enrollment.student_id))
                .order_by_desc(session_enrollments::Column::UpdatedAt)
                .one(&txn)
                .await?;
            let last_activity = last_booking
                .map(|b| b.updated_at)
                .unwrap_or(enrollment.updated_at);

            if last_activity < cutoff {
                let code = enrollment.code.clone();
                let mut active_model: enrollments::ActiveModel = enrollment.into();
                active_model.state = Set(EnrollmentState::Cancelled);
                active_model.updated_at = Set(now_utc());
                active_model.update(&txn).await?;
                cancelled += 1;
                log::info!(
                    "courtesy enrollment {code} cancelled after {cutoff_days} days of inactivity"
                );
            }
        }

        txn.commit().await?;
        Ok(cancelled)
    }

    /// Flags unstarted sessions that have seen no writes within the
    /// configured window. Already-flagged sessions are left alone.
    pub async fn flag_inactive_sessions(db: &DatabaseConnection) -> Result<usize, AcademyError> {
        let txn = db.begin().await?;
        let window_days = SettingsService::inactivity_days(&txn).await?;
        let cutoff = now_utc() - Duration::days(window_days);

        let stale = sessions::Entity::find()
            .filter(sessions::Column::State.is_in([
                SessionState::Draft,
                SessionState::Planned,
                SessionState::Active,
            ]))
            .filter(sessions::Column::InactiveFlaggedAt.is_null())
            .filter(sessions::Column::UpdatedAt.lt(cutoff))
            .all(&txn)
            .await?;

        let mut flagged = 0;
        for session in stale {
            let mut active: sessions::ActiveModel = session.into();
            active.inactive_flagged_at = Set(Some(now_utc()));
            active.update(&txn).await?;
            flagged += 1;
        }

        txn.commit().await?;
        if flagged > 0 {
            log::info!("flagged {flagged} sessions inactive after {window_days} days");
        }
        Ok(flagged)
    }
}
