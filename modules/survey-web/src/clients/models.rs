//! Payloads exchanged with the surveys API.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    SimpleText,
    MultipleChoice,
    FiveStars,
}

impl QuestionType {
    pub const ALL: [QuestionType; 3] = [
        QuestionType::SimpleText,
        QuestionType::MultipleChoice,
        QuestionType::FiveStars,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::SimpleText => "SimpleText",
            QuestionType::MultipleChoice => "MultipleChoice",
            QuestionType::FiveStars => "FiveStars",
        }
    }

    /// Parse the wire name of a question type.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::SimpleText => "Simple text",
            QuestionType::MultipleChoice => "Multiple choice",
            QuestionType::FiveStars => "Five stars",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub possible_answers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Survey {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub published: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveySummary {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub published: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSurveys {
    pub published: Vec<SurveySummary>,
    pub own: Vec<SurveySummary>,
    pub contribute: Vec<SurveySummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantSurveys {
    pub published: Vec<SurveySummary>,
    pub unpublished: Vec<SurveySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub issuer_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributorRequest {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub email_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributors {
    pub survey_id: Uuid,
    pub contributors: Vec<UserProfile>,
    pub requests: Vec<ContributorRequest>,
}

impl Contributors {
    /// Whether `email` is already a contributor or has a pending request.
    #[must_use]
    pub fn involves(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.contributors
            .iter()
            .any(|c| normalize_email(&c.email) == email)
            || self
                .requests
                .iter()
                .any(|r| normalize_email(&r.email_address) == email)
    }
}

/// Trim and lower-case an email address the way the API stores it.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyInput {
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionInput {
    pub text: String,
    pub question_type: QuestionType,
    pub possible_answers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContributorRequestInput {
    pub email_address: String,
}
