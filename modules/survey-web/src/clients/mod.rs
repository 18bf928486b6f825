//! Thin clients over the surveys REST API.
//!
//! Every call forwards the signed-in user's access token as a bearer token.
//! Controllers depend on the traits so tests can substitute recording fakes.

use async_trait::async_trait;
use secrecy::SecretString;
use uuid::Uuid;

mod error;
mod api_client;
pub mod models;

pub use error::ServiceError;
pub use api_client::SurveysApiClient;

use models::{
    ContributorRequest, ContributorRequestInput, Contributors, Question, QuestionInput, Survey,
    SurveyInput, SurveySummary, Tenant, TenantSurveys, UserProfile, UserSurveys,
};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[async_trait]
pub trait SurveyService: Send + Sync {
    async fn get_survey(&self, token: &SecretString, id: Uuid) -> ServiceResult<Survey>;

    async fn list_for_user(&self, token: &SecretString, user_id: Uuid)
    -> ServiceResult<UserSurveys>;

    async fn list_for_tenant(
        &self,
        token: &SecretString,
        tenant_id: Uuid,
    ) -> ServiceResult<TenantSurveys>;

    async fn list_published(&self, token: &SecretString) -> ServiceResult<Vec<SurveySummary>>;

    async fn create_survey(&self, token: &SecretString, input: &SurveyInput)
    -> ServiceResult<Survey>;

    async fn update_survey(
        &self,
        token: &SecretString,
        id: Uuid,
        input: &SurveyInput,
    ) -> ServiceResult<Survey>;

    async fn delete_survey(&self, token: &SecretString, id: Uuid) -> ServiceResult<()>;

    async fn publish(&self, token: &SecretString, id: Uuid) -> ServiceResult<Survey>;

    async fn unpublish(&self, token: &SecretString, id: Uuid) -> ServiceResult<Survey>;

    async fn get_contributors(&self, token: &SecretString, id: Uuid)
    -> ServiceResult<Contributors>;

    async fn process_pending_contributor_requests(&self, token: &SecretString)
    -> ServiceResult<()>;

    async fn add_contributor_request(
        &self,
        token: &SecretString,
        survey_id: Uuid,
        input: &ContributorRequestInput,
    ) -> ServiceResult<ContributorRequest>;
}

#[async_trait]
pub trait QuestionService: Send + Sync {
    async fn get_question(&self, token: &SecretString, id: Uuid) -> ServiceResult<Question>;

    async fn add_question(
        &self,
        token: &SecretString,
        survey_id: Uuid,
        input: &QuestionInput,
    ) -> ServiceResult<Question>;

    async fn update_question(
        &self,
        token: &SecretString,
        id: Uuid,
        input: &QuestionInput,
    ) -> ServiceResult<Question>;

    async fn delete_question(&self, token: &SecretString, id: Uuid) -> ServiceResult<()>;
}

/// Tenant sign-up and the signed-in user's profile.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn register_tenant(&self, token: &SecretString) -> ServiceResult<Tenant>;

    async fn current_user(&self, token: &SecretString) -> ServiceResult<UserProfile>;
}
