use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Survey not found: {id}")]
    SurveyNotFound { id: Uuid },

    #[error("Question not found: {id}")]
    QuestionNotFound { id: Uuid },

    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("Access denied: {reason}")]
    Forbidden { reason: String },

    #[error("Tenant for issuer '{issuer}' is not registered")]
    TenantNotRegistered { issuer: String },

    #[error("Tenant for issuer '{issuer}' is already registered")]
    TenantAlreadyRegistered { issuer: String },

    #[error("'{email}' is already a contributor of this survey")]
    AlreadyContributor { email: String },

    #[error("A contributor request for '{email}' is already pending")]
    ContributorRequestExists { email: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn survey_not_found(id: Uuid) -> Self {
        Self::SurveyNotFound { id }
    }

    pub fn question_not_found(id: Uuid) -> Self {
        Self::QuestionNotFound { id }
    }

    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn tenant_not_registered(issuer: impl Into<String>) -> Self {
        Self::TenantNotRegistered {
            issuer: issuer.into(),
        }
    }

    pub fn tenant_already_registered(issuer: impl Into<String>) -> Self {
        Self::TenantAlreadyRegistered {
            issuer: issuer.into(),
        }
    }

    pub fn already_contributor(email: impl Into<String>) -> Self {
        Self::AlreadyContributor {
            email: email.into(),
        }
    }

    pub fn contributor_request_exists(email: impl Into<String>) -> Self {
        Self::ContributorRequestExists {
            email: email.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
