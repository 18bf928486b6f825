use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use super::models::{
    ContributorRequest, ContributorRequestInput, Contributors, Question, QuestionInput, Survey,
    SurveyInput, SurveySummary, Tenant, TenantSurveys, UserProfile, UserSurveys,
};
use super::{AccountService, QuestionService, ServiceError, ServiceResult, SurveyService};

/// reqwest-backed client for the surveys REST API.
#[derive(Clone)]
pub struct SurveysApiClient {
    http: Client,
    base: Url,
}

#[derive(serde::Deserialize)]
struct ProblemBody {
    detail: Option<String>,
}

impl SurveysApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        token: &SecretString,
    ) -> ServiceResult<RequestBuilder> {
        let url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ServiceError::Unexpected(format!("invalid API path '{path}': {e}")))?;
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token.expose_secret()))
    }

    async fn send(builder: RequestBuilder) -> ServiceResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<ProblemBody>()
            .await
            .ok()
            .and_then(|p| p.detail);
        tracing::debug!(%status, detail = detail.as_deref().unwrap_or(""), "surveys API call failed");
        Err(ServiceError::from_status(status, detail))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SecretString,
    ) -> ServiceResult<T> {
        let response = Self::send(self.request(Method::GET, path, token)?).await?;
        Ok(response.json().await?)
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        token: &SecretString,
        body: Option<&B>,
    ) -> ServiceResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let mut builder = self.request(method, path, token)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = Self::send(builder).await?;
        Ok(response.json().await?)
    }

    async fn send_no_content(
        &self,
        method: Method,
        path: &str,
        token: &SecretString,
    ) -> ServiceResult<()> {
        Self::send(self.request(method, path, token)?).await?;
        Ok(())
    }
}

#[async_trait]
impl SurveyService for SurveysApiClient {
    async fn get_survey(&self, token: &SecretString, id: Uuid) -> ServiceResult<Survey> {
        self.get_json(&format!("surveys/{id}"), token).await
    }

    async fn list_for_user(
        &self,
        token: &SecretString,
        user_id: Uuid,
    ) -> ServiceResult<UserSurveys> {
        self.get_json(&format!("users/{user_id}/surveys"), token)
            .await
    }

    async fn list_for_tenant(
        &self,
        token: &SecretString,
        tenant_id: Uuid,
    ) -> ServiceResult<TenantSurveys> {
        self.get_json(&format!("tenants/{tenant_id}/surveys"), token)
            .await
    }

    async fn list_published(&self, token: &SecretString) -> ServiceResult<Vec<SurveySummary>> {
        self.get_json("surveys/published", token).await
    }

    async fn create_survey(
        &self,
        token: &SecretString,
        input: &SurveyInput,
    ) -> ServiceResult<Survey> {
        self.send_json(Method::POST, "surveys", token, Some(input))
            .await
    }

    async fn update_survey(
        &self,
        token: &SecretString,
        id: Uuid,
        input: &SurveyInput,
    ) -> ServiceResult<Survey> {
        self.send_json(Method::PUT, &format!("surveys/{id}"), token, Some(input))
            .await
    }

    async fn delete_survey(&self, token: &SecretString, id: Uuid) -> ServiceResult<()> {
        self.send_no_content(Method::DELETE, &format!("surveys/{id}"), token)
            .await
    }

    async fn publish(&self, token: &SecretString, id: Uuid) -> ServiceResult<Survey> {
        self.send_json::<(), _>(Method::PUT, &format!("surveys/{id}/publish"), token, None)
            .await
    }

    async fn unpublish(&self, token: &SecretString, id: Uuid) -> ServiceResult<Survey> {
        self.send_json::<(), _>(Method::PUT, &format!("surveys/{id}/unpublish"), token, None)
            .await
    }

    async fn get_contributors(
        &self,
        token: &SecretString,
        id: Uuid,
    ) -> ServiceResult<Contributors> {
        self.get_json(&format!("surveys/{id}/contributors"), token)
            .await
    }

    async fn process_pending_contributor_requests(
        &self,
        token: &SecretString,
    ) -> ServiceResult<()> {
        self.send_no_content(
            Method::POST,
            "surveys/processpendingcontributorrequests",
            token,
        )
        .await
    }

    async fn add_contributor_request(
        &self,
        token: &SecretString,
        survey_id: Uuid,
        input: &ContributorRequestInput,
    ) -> ServiceResult<ContributorRequest> {
        self.send_json(
            Method::POST,
            &format!("surveys/{survey_id}/contributorrequests"),
            token,
            Some(input),
        )
        .await
    }
}

#[async_trait]
impl QuestionService for SurveysApiClient {
    async fn get_question(&self, token: &SecretString, id: Uuid) -> ServiceResult<Question> {
        self.get_json(&format!("questions/{id}"), token).await
    }

    async fn add_question(
        &self,
        token: &SecretString,
        survey_id: Uuid,
        input: &QuestionInput,
    ) -> ServiceResult<Question> {
        self.send_json(
            Method::POST,
            &format!("surveys/{survey_id}/questions"),
            token,
            Some(input),
        )
        .await
    }

    async fn update_question(
        &self,
        token: &SecretString,
        id: Uuid,
        input: &QuestionInput,
    ) -> ServiceResult<Question> {
        self.send_json(Method::PUT, &format!("questions/{id}"), token, Some(input))
            .await
    }

    async fn delete_question(&self, token: &SecretString, id: Uuid) -> ServiceResult<()> {
        self.send_no_content(Method::DELETE, &format!("questions/{id}"), token)
            .await
    }
}

#[async_trait]
impl AccountService for SurveysApiClient {
    async fn register_tenant(&self, token: &SecretString) -> ServiceResult<Tenant> {
        self.send_json::<(), _>(Method::POST, "tenants", token, None)
            .await
    }

    async fn current_user(&self, token: &SecretString) -> ServiceResult<UserProfile> {
        self.get_json("users/me", token).await
    }
}
