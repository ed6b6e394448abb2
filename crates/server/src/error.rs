use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use database::error::AcademyError;
use serde_json::json;

/// HTTP wrapper for engine errors.
pub struct ApiError(pub AcademyError);

impl From<AcademyError> for ApiError {
    fn from(err: AcademyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AcademyError::NotFound(_) => StatusCode::NOT_FOUND,
            AcademyError::ResourceConflict { .. }
            | AcademyError::DuplicateEnrollment
            | AcademyError::SessionFull { .. }
            | AcademyError::AlreadyCompleted { .. } => StatusCode::CONFLICT,
            AcademyError::PrerequisitesUnmet { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AcademyError::FinancialBlock => StatusCode::FORBIDDEN,
            AcademyError::Validation(_)
            | AcademyError::CycleDetected { .. }
            | AcademyError::DayNotAllowed { .. }
            | AcademyError::StartOutsideWindow { .. }
            | AcademyError::EndOutsideWindow { .. }
            | AcademyError::PlanCompleted
            | AcademyError::InvalidTransition { .. }
            | AcademyError::MissingReason => StatusCode::BAD_REQUEST,
            AcademyError::SyncFailure(_) | AcademyError::Db(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("request failed: {}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}
