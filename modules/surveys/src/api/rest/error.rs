use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::api::rest::problem::Problem;
use crate::domain::error::DomainError;

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        let (status, code) = match &e {
            DomainError::SurveyNotFound { .. } => (StatusCode::NOT_FOUND, "SURVEY_NOT_FOUND"),
            DomainError::QuestionNotFound { .. } => (StatusCode::NOT_FOUND, "QUESTION_NOT_FOUND"),
            DomainError::UserNotFound { .. } => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            DomainError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            DomainError::TenantNotRegistered { .. } => {
                (StatusCode::FORBIDDEN, "TENANT_NOT_REGISTERED")
            }
            DomainError::TenantAlreadyRegistered { .. } => {
                (StatusCode::CONFLICT, "TENANT_ALREADY_REGISTERED")
            }
            DomainError::AlreadyContributor { .. } => (StatusCode::CONFLICT, "ALREADY_CONTRIBUTOR"),
            DomainError::ContributorRequestExists { .. } => {
                (StatusCode::CONFLICT, "CONTRIBUTOR_REQUEST_EXISTS")
            }
            DomainError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED"),
            DomainError::Database { .. } => {
                tracing::error!(error = ?e, "Database error occurred");
                return Problem::internal();
            }
        };

        let problem = Problem::new(status, code, e.to_string());
        match e {
            DomainError::SurveyNotFound { id } => problem.about(format!("/surveys/{id}")),
            DomainError::QuestionNotFound { id } => problem.about(format!("/questions/{id}")),
            DomainError::UserNotFound { id } => problem.about(format!("/users/{id}")),
            _ => problem,
        }
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        Problem::from(self).into_response()
    }
}
