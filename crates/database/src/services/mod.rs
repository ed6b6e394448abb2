pub mod booking;
pub mod campus;
pub mod curriculum;
pub mod enrollment;
pub mod maintenance;
pub mod progression;
pub mod session;
pub mod settings;
pub mod student;
pub mod sync;

use crate::entities::{
    campuses, elective_pools, enrollments, levels, phases, plans, programs, rooms, sessions,
    students, subjects,
};
use crate::error::AcademyError;
use models::codes;
use sea_orm::prelude::DateTime;
use sea_orm::{ConnectionTrait, EntityTrait};

/// Current UTC instant as stored in the database (naive UTC).
pub(crate) fn now_utc() -> DateTime {
    chrono::Utc::now().naive_utc()
}

/// Entities whose rows carry a human-readable code column ("PRG-3", "A-17").
pub(crate) trait CodeCarrier {
    fn code(&self) -> &str;
}

macro_rules! impl_code_carrier {
    ($($model:ty),* $(,)?) => {
        $(impl CodeCarrier for $model {
            fn code(&self) -> &str {
                &self.code
            }
        })*
    };
}

impl_code_carrier!(
    programs::Model,
    plans::Model,
    phases::Model,
    levels::Model,
    subjects::Model,
    elective_pools::Model,
    campuses::Model,
    rooms::Model,
    students::Model,
    enrollments::Model,
    sessions::Model,
);

/// Allocates the next code for a table by scanning its existing codes under
/// the creating transaction (the lock-and-scan the code scheme requires).
pub(crate) async fn next_table_code<E, C>(conn: &C, prefix: &str) -> Result<String, AcademyError>
where
    E: EntityTrait,
    E::Model: CodeCarrier,
    C: ConnectionTrait,
{
    let rows = E::find().all(conn).await?;
    let existing: Vec<String> = rows.iter().map(|m| m.code().to_string()).collect();
    Ok(codes::next_code(prefix, existing))
}
