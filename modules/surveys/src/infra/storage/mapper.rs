use crate::domain::error::DomainError;
use crate::domain::model::{ContributorRequest, Question, Survey, Tenant, User};
use crate::infra::storage::entity::{contributor_request, question, survey, tenant, user};

const ANSWER_SEPARATOR: &str = "\n";

impl From<tenant::Model> for Tenant {
    fn from(e: tenant::Model) -> Self {
        Self {
            id: e.id,
            issuer_value: e.issuer_value,
            created_at: e.created_at,
        }
    }
}

impl From<user::Model> for User {
    fn from(e: user::Model) -> Self {
        Self {
            id: e.id,
            tenant_id: e.tenant_id,
            object_id: e.object_id,
            email: e.email,
            display_name: e.display_name,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

impl From<survey::Model> for Survey {
    fn from(e: survey::Model) -> Self {
        Self {
            id: e.id,
            tenant_id: e.tenant_id,
            owner_id: e.owner_id,
            title: e.title,
            published: e.published,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

impl From<contributor_request::Model> for ContributorRequest {
    fn from(e: contributor_request::Model) -> Self {
        Self {
            id: e.id,
            survey_id: e.survey_id,
            email_address: e.email_address,
            created_at: e.created_at,
        }
    }
}

impl TryFrom<question::Model> for Question {
    type Error = DomainError;

    fn try_from(e: question::Model) -> Result<Self, Self::Error> {
        let question_type = e.question_type.parse().map_err(DomainError::database)?;
        Ok(Self {
            id: e.id,
            survey_id: e.survey_id,
            text: e.text,
            question_type,
            possible_answers: split_answers(e.possible_answers.as_deref()),
        })
    }
}

pub(crate) fn join_answers(answers: &[String]) -> Option<String> {
    if answers.is_empty() {
        None
    } else {
        Some(answers.join(ANSWER_SEPARATOR))
    }
}

pub(crate) fn split_answers(stored: Option<&str>) -> Vec<String> {
    stored
        .map(|s| {
            s.split(ANSWER_SEPARATOR)
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
