//! Domain models shared by the service and storage layers.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    pub id: Uuid,
    /// Token issuer of the directory tenant; unique
    pub issuer_value: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Identity provider object id; unique within the tenant
    pub object_id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Survey {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub published: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    SimpleText,
    MultipleChoice,
    FiveStars,
}

impl QuestionType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::SimpleText => "SimpleText",
            QuestionType::MultipleChoice => "MultipleChoice",
            QuestionType::FiveStars => "FiveStars",
        }
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SimpleText" => Ok(QuestionType::SimpleText),
            "MultipleChoice" => Ok(QuestionType::MultipleChoice),
            "FiveStars" => Ok(QuestionType::FiveStars),
            other => Err(format!("unknown question type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub text: String,
    pub question_type: QuestionType,
    pub possible_answers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributorRequest {
    pub id: Uuid,
    pub survey_id: Uuid,
    /// Normalized (trimmed, lower-case) invitee email
    pub email_address: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewSurvey {
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct SurveyPatch {
    pub title: String,
}

/// Question content, used both for creation and full replacement
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    pub text: String,
    pub question_type: QuestionType,
    pub possible_answers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SurveyDetails {
    pub survey: Survey,
    pub questions: Vec<Question>,
}

/// Surveys visible to one user on their home page
#[derive(Debug, Clone, Default)]
pub struct UserSurveys {
    pub published: Vec<Survey>,
    pub own: Vec<Survey>,
    pub contribute: Vec<Survey>,
}

#[derive(Debug, Clone, Default)]
pub struct TenantSurveys {
    pub published: Vec<Survey>,
    pub unpublished: Vec<Survey>,
}

#[derive(Debug, Clone)]
pub struct SurveyContributors {
    pub survey_id: Uuid,
    pub contributors: Vec<User>,
    pub requests: Vec<ContributorRequest>,
}

/// Authenticated user resolved from token claims
#[derive(Debug, Clone)]
pub struct Caller {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub roles: Vec<String>,
}

impl Caller {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(survey_auth::SURVEY_ADMIN)
    }

    #[must_use]
    pub fn is_creator(&self) -> bool {
        self.has_role(survey_auth::SURVEY_CREATOR)
    }

    fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
