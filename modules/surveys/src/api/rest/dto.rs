use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::model::{
    ContributorRequest, NewSurvey, Question, QuestionDraft, QuestionType, Survey,
    SurveyContributors, SurveyDetails, SurveyPatch, Tenant, TenantSurveys, User, UserSurveys,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum QuestionTypeDto {
    SimpleText,
    MultipleChoice,
    FiveStars,
}

impl From<QuestionType> for QuestionTypeDto {
    fn from(t: QuestionType) -> Self {
        match t {
            QuestionType::SimpleText => Self::SimpleText,
            QuestionType::MultipleChoice => Self::MultipleChoice,
            QuestionType::FiveStars => Self::FiveStars,
        }
    }
}

impl From<QuestionTypeDto> for QuestionType {
    fn from(t: QuestionTypeDto) -> Self {
        match t {
            QuestionTypeDto::SimpleText => Self::SimpleText,
            QuestionTypeDto::MultipleChoice => Self::MultipleChoice,
            QuestionTypeDto::FiveStars => Self::FiveStars,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionDto {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub text: String,
    pub question_type: QuestionTypeDto,
    pub possible_answers: Vec<String>,
}

impl From<Question> for QuestionDto {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            survey_id: q.survey_id,
            text: q.text,
            question_type: q.question_type.into(),
            possible_answers: q.possible_answers,
        }
    }
}

/// Survey with its questions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SurveyDto {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub published: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub questions: Vec<QuestionDto>,
}

impl From<SurveyDetails> for SurveyDto {
    fn from(details: SurveyDetails) -> Self {
        let SurveyDetails { survey, questions } = details;
        Self {
            questions: questions.into_iter().map(QuestionDto::from).collect(),
            ..Self::from(survey)
        }
    }
}

impl From<Survey> for SurveyDto {
    fn from(s: Survey) -> Self {
        Self {
            id: s.id,
            tenant_id: s.tenant_id,
            owner_id: s.owner_id,
            title: s.title,
            published: s.published,
            created_at: s.created_at,
            updated_at: s.updated_at,
            questions: Vec::new(),
        }
    }
}

/// Survey without its questions, used in listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SurveySummaryDto {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub published: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Survey> for SurveySummaryDto {
    fn from(s: Survey) -> Self {
        Self {
            id: s.id,
            owner_id: s.owner_id,
            title: s.title,
            published: s.published,
            updated_at: s.updated_at,
        }
    }
}

fn summaries(surveys: Vec<Survey>) -> Vec<SurveySummaryDto> {
    surveys.into_iter().map(SurveySummaryDto::from).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSurveysDto {
    pub published: Vec<SurveySummaryDto>,
    pub own: Vec<SurveySummaryDto>,
    pub contribute: Vec<SurveySummaryDto>,
}

impl From<UserSurveys> for UserSurveysDto {
    fn from(s: UserSurveys) -> Self {
        Self {
            published: summaries(s.published),
            own: summaries(s.own),
            contribute: summaries(s.contribute),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TenantSurveysDto {
    pub published: Vec<SurveySummaryDto>,
    pub unpublished: Vec<SurveySummaryDto>,
}

impl From<TenantSurveys> for TenantSurveysDto {
    fn from(s: TenantSurveys) -> Self {
        Self {
            published: summaries(s.published),
            unpublished: summaries(s.unpublished),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub display_name: String,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            tenant_id: u.tenant_id,
            email: u.email,
            display_name: u.display_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TenantDto {
    pub id: Uuid,
    pub issuer_value: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Tenant> for TenantDto {
    fn from(t: Tenant) -> Self {
        Self {
            id: t.id,
            issuer_value: t.issuer_value,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContributorRequestDto {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub email_address: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<ContributorRequest> for ContributorRequestDto {
    fn from(r: ContributorRequest) -> Self {
        Self {
            id: r.id,
            survey_id: r.survey_id,
            email_address: r.email_address,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContributorsDto {
    pub survey_id: Uuid,
    pub contributors: Vec<UserDto>,
    pub requests: Vec<ContributorRequestDto>,
}

impl From<SurveyContributors> for ContributorsDto {
    fn from(c: SurveyContributors) -> Self {
        Self {
            survey_id: c.survey_id,
            contributors: c.contributors.into_iter().map(UserDto::from).collect(),
            requests: c
                .requests
                .into_iter()
                .map(ContributorRequestDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSurveyReq {
    pub title: String,
}

impl From<CreateSurveyReq> for NewSurvey {
    fn from(req: CreateSurveyReq) -> Self {
        Self { title: req.title }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateSurveyReq {
    pub title: String,
}

impl From<UpdateSurveyReq> for SurveyPatch {
    fn from(req: UpdateSurveyReq) -> Self {
        Self { title: req.title }
    }
}

/// Question content for creation and replacement.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuestionReq {
    pub text: String,
    pub question_type: QuestionTypeDto,
    #[serde(default)]
    pub possible_answers: Vec<String>,
}

impl From<QuestionReq> for QuestionDraft {
    fn from(req: QuestionReq) -> Self {
        Self {
            text: req.text,
            question_type: req.question_type.into(),
            possible_answers: req.possible_answers,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateContributorRequestReq {
    pub email_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    pub status: String,
}
