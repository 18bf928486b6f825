#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use secrecy::SecretString;
use survey_auth::{AuthError, Claims, SURVEY_ADMIN, SURVEY_CREATOR, TokenValidator};
use survey_web::{
    FormLimits, OidcConfig, WebApp, WebConfig,
    clients::{
        AccountService, QuestionService, ServiceError, ServiceResult, SurveyService,
        models::{
            ContributorRequest, ContributorRequestInput, Contributors, Question, QuestionInput,
            Survey, SurveyInput, SurveySummary, Tenant, TenantSurveys, UserProfile, UserSurveys,
        },
    },
    session::{Session, SessionStore},
};
use time::OffsetDateTime;
use uuid::Uuid;

pub const COOKIE: &str = "surveys_session";

/// In-memory stand-in for the surveys API that records every call.
#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<&'static str>>,
    surveys: Mutex<HashMap<Uuid, Survey>>,
    questions: Mutex<HashMap<Uuid, Question>>,
    contributors: Mutex<HashMap<Uuid, Contributors>>,
    failures: Mutex<HashMap<&'static str, StatusCode>>,
    pub profile: Mutex<Option<UserProfile>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, name: &str) -> bool {
        self.calls().contains(&name)
    }

    /// Make every later call to `method` fail with `status`.
    pub fn fail(&self, method: &'static str, status: StatusCode) {
        self.failures.lock().unwrap().insert(method, status);
    }

    pub fn add_survey(&self, published: bool) -> Survey {
        let now = OffsetDateTime::now_utc();
        let survey = Survey {
            id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            owner_id: Uuid::now_v7(),
            title: "Team lunch".to_owned(),
            published,
            created_at: now,
            updated_at: now,
            questions: Vec::new(),
        };
        self.surveys.lock().unwrap().insert(survey.id, survey.clone());
        self.contributors.lock().unwrap().insert(
            survey.id,
            Contributors {
                survey_id: survey.id,
                contributors: Vec::new(),
                requests: Vec::new(),
            },
        );
        survey
    }

    pub fn add_contributor(&self, survey_id: Uuid, email: &str) {
        let mut all = self.contributors.lock().unwrap();
        let entry = all.get_mut(&survey_id).unwrap();
        entry.contributors.push(UserProfile {
            id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            email: email.to_owned(),
            display_name: email.to_owned(),
        });
    }

    pub fn add_pending_request(&self, survey_id: Uuid, email: &str) {
        let mut all = self.contributors.lock().unwrap();
        let entry = all.get_mut(&survey_id).unwrap();
        entry.requests.push(ContributorRequest {
            id: Uuid::now_v7(),
            survey_id,
            email_address: email.to_owned(),
        });
    }

    pub fn add_question(&self, survey_id: Uuid) -> Question {
        let question = Question {
            id: Uuid::now_v7(),
            survey_id,
            text: "Pizza or pasta?".to_owned(),
            question_type: survey_web::clients::models::QuestionType::SimpleText,
            possible_answers: Vec::new(),
        };
        self.questions
            .lock()
            .unwrap()
            .insert(question.id, question.clone());
        question
    }

    pub fn survey(&self, id: Uuid) -> Option<Survey> {
        self.surveys.lock().unwrap().get(&id).cloned()
    }

    fn record(&self, method: &'static str) -> ServiceResult<()> {
        self.calls.lock().unwrap().push(method);
        match self.failures.lock().unwrap().get(method) {
            Some(status) => Err(ServiceError::from_status(*status, None)),
            None => Ok(()),
        }
    }

    fn set_published(&self, id: Uuid, published: bool) -> ServiceResult<Survey> {
        let mut surveys = self.surveys.lock().unwrap();
        let survey = surveys.get_mut(&id).ok_or(ServiceError::NotFound)?;
        survey.published = published;
        Ok(survey.clone())
    }
}

fn summary(s: &Survey) -> SurveySummary {
    SurveySummary {
        id: s.id,
        owner_id: s.owner_id,
        title: s.title.clone(),
        published: s.published,
        updated_at: s.updated_at,
    }
}

#[async_trait]
impl SurveyService for FakeApi {
    async fn get_survey(&self, _token: &SecretString, id: Uuid) -> ServiceResult<Survey> {
        self.record("get_survey")?;
        self.survey(id).ok_or(ServiceError::NotFound)
    }

    async fn list_for_user(
        &self,
        _token: &SecretString,
        _user_id: Uuid,
    ) -> ServiceResult<UserSurveys> {
        self.record("list_for_user")?;
        let own = self.surveys.lock().unwrap().values().map(summary).collect();
        Ok(UserSurveys {
            published: Vec::new(),
            own,
            contribute: Vec::new(),
        })
    }

    async fn list_for_tenant(
        &self,
        _token: &SecretString,
        _tenant_id: Uuid,
    ) -> ServiceResult<TenantSurveys> {
        self.record("list_for_tenant")?;
        let (published, unpublished) = self
            .surveys
            .lock()
            .unwrap()
            .values()
            .map(summary)
            .partition(|s| s.published);
        Ok(TenantSurveys {
            published,
            unpublished,
        })
    }

    async fn list_published(&self, _token: &SecretString) -> ServiceResult<Vec<SurveySummary>> {
        self.record("list_published")?;
        Ok(self
            .surveys
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.published)
            .map(summary)
            .collect())
    }

    async fn create_survey(
        &self,
        _token: &SecretString,
        input: &SurveyInput,
    ) -> ServiceResult<Survey> {
        self.record("create_survey")?;
        let mut survey = self.add_survey(false);
        survey.title.clone_from(&input.title);
        self.surveys.lock().unwrap().insert(survey.id, survey.clone());
        Ok(survey)
    }

    async fn update_survey(
        &self,
        _token: &SecretString,
        id: Uuid,
        input: &SurveyInput,
    ) -> ServiceResult<Survey> {
        self.record("update_survey")?;
        let mut surveys = self.surveys.lock().unwrap();
        let survey = surveys.get_mut(&id).ok_or(ServiceError::NotFound)?;
        survey.title.clone_from(&input.title);
        Ok(survey.clone())
    }

    async fn delete_survey(&self, _token: &SecretString, id: Uuid) -> ServiceResult<()> {
        self.record("delete_survey")?;
        self.surveys
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(ServiceError::NotFound)
    }

    async fn publish(&self, _token: &SecretString, id: Uuid) -> ServiceResult<Survey> {
        self.record("publish")?;
        self.set_published(id, true)
    }

    async fn unpublish(&self, _token: &SecretString, id: Uuid) -> ServiceResult<Survey> {
        self.record("unpublish")?;
        self.set_published(id, false)
    }

    async fn get_contributors(
        &self,
        _token: &SecretString,
        id: Uuid,
    ) -> ServiceResult<Contributors> {
        self.record("get_contributors")?;
        self.contributors
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    async fn process_pending_contributor_requests(
        &self,
        _token: &SecretString,
    ) -> ServiceResult<()> {
        self.record("process_pending_contributor_requests")
    }

    async fn add_contributor_request(
        &self,
        _token: &SecretString,
        survey_id: Uuid,
        input: &ContributorRequestInput,
    ) -> ServiceResult<ContributorRequest> {
        self.record("add_contributor_request")?;
        self.add_pending_request(survey_id, &input.email_address);
        Ok(ContributorRequest {
            id: Uuid::now_v7(),
            survey_id,
            email_address: input.email_address.clone(),
        })
    }
}

#[async_trait]
impl QuestionService for FakeApi {
    async fn get_question(&self, _token: &SecretString, id: Uuid) -> ServiceResult<Question> {
        self.record("get_question")?;
        self.questions
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    async fn add_question(
        &self,
        _token: &SecretString,
        survey_id: Uuid,
        input: &QuestionInput,
    ) -> ServiceResult<Question> {
        self.record("add_question")?;
        let question = Question {
            id: Uuid::now_v7(),
            survey_id,
            text: input.text.clone(),
            question_type: input.question_type,
            possible_answers: input.possible_answers.clone(),
        };
        self.questions
            .lock()
            .unwrap()
            .insert(question.id, question.clone());
        Ok(question)
    }

    async fn update_question(
        &self,
        _token: &SecretString,
        id: Uuid,
        input: &QuestionInput,
    ) -> ServiceResult<Question> {
        self.record("update_question")?;
        let mut questions = self.questions.lock().unwrap();
        let question = questions.get_mut(&id).ok_or(ServiceError::NotFound)?;
        question.text.clone_from(&input.text);
        Ok(question.clone())
    }

    async fn delete_question(&self, _token: &SecretString, id: Uuid) -> ServiceResult<()> {
        self.record("delete_question")?;
        self.questions
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(ServiceError::NotFound)
    }
}

#[async_trait]
impl AccountService for FakeApi {
    async fn register_tenant(&self, _token: &SecretString) -> ServiceResult<Tenant> {
        self.record("register_tenant")?;
        Ok(Tenant {
            id: Uuid::now_v7(),
            issuer_value: "https://idp.example.com/t1/".to_owned(),
        })
    }

    async fn current_user(&self, _token: &SecretString) -> ServiceResult<UserProfile> {
        self.record("current_user")?;
        self.profile.lock().unwrap().clone().ok_or(ServiceError::NotFound)
    }
}

/// Accepts the single token `idp-token`.
pub struct StubValidator;

#[async_trait]
impl TokenValidator for StubValidator {
    async fn validate_and_parse(&self, token: &str) -> Result<Claims, AuthError> {
        if token != "idp-token" {
            return Err(AuthError::InvalidToken("unknown token".to_owned()));
        }
        Ok(Claims {
            issuer: "https://idp.example.com/t1/".to_owned(),
            subject: "subject".to_owned(),
            audiences: vec!["surveys".to_owned()],
            expires_at: None,
            not_before: None,
            tenant_id: "t1".to_owned(),
            object_id: "o1".to_owned(),
            email: Some("alice@example.com".to_owned()),
            name: Some("Alice".to_owned()),
            roles: vec![SURVEY_CREATOR.to_owned()],
            extras: serde_json::Map::new(),
        })
    }
}

pub fn config(idp_base: &str) -> WebConfig {
    WebConfig {
        public_base_url: "https://surveys.example.com".to_owned(),
        cookie_name: COOKIE.to_owned(),
        oidc: OidcConfig {
            authorize_endpoint: format!("{idp_base}/authorize"),
            token_endpoint: format!("{idp_base}/token"),
            end_session_endpoint: Some(format!("{idp_base}/logout")),
            client_id: "web-client".to_owned(),
            client_secret: "web-secret".to_owned(),
            ..OidcConfig::default()
        },
        ..WebConfig::default()
    }
}

pub struct TestApp {
    pub api: Arc<FakeApi>,
    pub sessions: Arc<SessionStore>,
    pub router: Router,
}

pub fn app() -> TestApp {
    app_with_idp("https://idp.example.com")
}

pub fn app_with_idp(idp_base: &str) -> TestApp {
    build(config(idp_base))
}

pub fn app_with_limits(limits: FormLimits) -> TestApp {
    build(WebConfig {
        limits,
        ..config("https://idp.example.com")
    })
}

fn build(config: WebConfig) -> TestApp {
    let api = Arc::new(FakeApi::default());
    let web = WebApp::with_services(
        config,
        Arc::clone(&api) as Arc<dyn SurveyService>,
        Arc::clone(&api) as Arc<dyn QuestionService>,
        Arc::clone(&api) as Arc<dyn AccountService>,
        Arc::new(StubValidator),
    )
    .unwrap();
    TestApp {
        api,
        sessions: web.sessions(),
        router: web.router(),
    }
}

impl TestApp {
    /// Insert a session with `roles` and return its cookie id.
    pub fn sign_in(&self, roles: &[&str]) -> String {
        self.sessions.insert(Session {
            access_token: SecretString::from("api-token".to_owned()),
            user_id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            email: "alice@example.com".to_owned(),
            display_name: "Alice".to_owned(),
            roles: roles.iter().map(|r| (*r).to_owned()).collect(),
            expires_at: OffsetDateTime::now_utc() + time::Duration::hours(1),
        })
    }

    pub fn sign_in_admin(&self) -> String {
        self.sign_in(&[SURVEY_ADMIN])
    }
}

pub fn get(uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(id) = session {
        builder = builder.header(header::COOKIE, format!("{COOKIE}={id}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, session: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, format!("{COOKIE}={session}"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_owned()))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}
