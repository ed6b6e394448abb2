use crate::error::AcademyError;
use sea_orm::{Database, DatabaseConnection, DbErr};
use std::future::Future;

/// Bound on automatic retries of a transaction that lost a serialization
/// race. Anything still failing after this propagates to the caller.
const MAX_CONFLICT_RETRIES: u32 = 3;

/// Creates a database connection from `DATABASE_URL`.
pub async fn create_connection() -> Result<DatabaseConnection, DbErr> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| DbErr::Custom("DATABASE_URL is not set".to_string()))?;
    Database::connect(url).await
}

/// Runs a transactional operation, retrying it whole when the database
/// reports a serialization conflict or deadlock. Domain errors are never
/// retried.
pub async fn with_conflict_retry<T, F, Fut>(mut operation: F) -> Result<T, AcademyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AcademyError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Err(err) if err.is_serialization_conflict() && attempt < MAX_CONFLICT_RETRIES => {
                attempt += 1;
                log::warn!("retrying after serialization conflict (attempt {attempt}): {err}");
            }
            result => return result,
        }
    }
}
