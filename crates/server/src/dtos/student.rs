use chrono::NaiveDate;
use database::entities::students;
use models::states::{StudentState, TransitionOrigin};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub phone: Option<String>,
    /// Defaults to true; the payments collaborator keeps it up to date.
    pub financially_current: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransitionStudentRequest {
    #[schema(value_type = String, example = "active")]
    pub to: StudentState,
    pub reason: Option<String>,
    #[schema(value_type = Option<String>, example = "manual")]
    pub origin: Option<TransitionOrigin>,
    pub actor: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentResponse {
    pub id: Uuid,
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub phone: Option<String>,
    pub state: String,
    pub financially_current: bool,
}

impl From<students::Model> for StudentResponse {
    fn from(student: students::Model) -> Self {
        Self {
            id: student.id,
            code: student.code,
            first_name: student.first_name,
            last_name: student.last_name,
            email: student.email,
            birth_date: student.birth_date,
            phone: student.phone,
            state: student.state.to_string(),
            financially_current: student.financially_current,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MaxUnitResponse {
    pub student_id: Uuid,
    pub max_completed_unit: i32,
}
