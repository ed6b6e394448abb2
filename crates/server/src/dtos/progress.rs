use chrono::NaiveDate;
use database::entities::{enrollment_progress, subjects};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// One row of the student's progress table (subject x state).
#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressRowResponse {
    pub subject_id: Uuid,
    pub subject_code: String,
    pub subject_name: String,
    pub category: String,
    pub unit_number: Option<i32>,
    pub state: String,
    pub started_on: Option<NaiveDate>,
    pub completed_on: Option<NaiveDate>,
    pub final_grade: Option<f32>,
}

impl ProgressRowResponse {
    pub fn from_pair(subject: subjects::Model, progress: enrollment_progress::Model) -> Self {
        Self {
            subject_id: subject.id,
            subject_code: subject.code,
            subject_name: subject.name,
            category: subject.category.to_string(),
            unit_number: subject.unit_number,
            state: progress.state.to_string(),
            started_on: progress.started_on,
            completed_on: progress.completed_on,
            final_grade: progress.final_grade,
        }
    }
}
