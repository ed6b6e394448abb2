use chrono::NaiveDate;
use database::entities::enrollments;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEnrollmentRequest {
    pub student_id: Uuid,
    pub plan_id: Uuid,
    pub initial_subject_id: Option<Uuid>,
    pub actor: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FinishEnrollmentRequest {
    pub grade: f32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HomologateRequest {
    pub justification: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReactivateRequest {
    /// Coordinators may reactivate past a financial block.
    #[serde(default)]
    pub coordinator: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub code: String,
    pub student_id: Uuid,
    pub plan_id: Uuid,
    pub state: String,
    pub current_phase_id: Option<Uuid>,
    pub current_level_id: Option<Uuid>,
    pub current_subject_id: Option<Uuid>,
    pub financial_override: bool,
    pub final_grade: Option<f32>,
    pub started_on: Option<NaiveDate>,
    pub finished_on: Option<NaiveDate>,
}

impl From<enrollments::Model> for EnrollmentResponse {
    fn from(enrollment: enrollments::Model) -> Self {
        Self {
            id: enrollment.id,
            code: enrollment.code,
            student_id: enrollment.student_id,
            plan_id: enrollment.plan_id,
            state: enrollment.state.to_string(),
            current_phase_id: enrollment.current_phase_id,
            current_level_id: enrollment.current_level_id,
            current_subject_id: enrollment.current_subject_id,
            financial_override: enrollment.financial_override,
            final_grade: enrollment.final_grade,
            started_on: enrollment.started_on,
            finished_on: enrollment.finished_on,
        }
    }
}
