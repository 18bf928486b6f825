//! Survey authoring web front-end.
//!
//! Signs users in through OpenID Connect, keeps their access token in a
//! server-side session and renders HTML pages over the surveys REST API.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod oidc;
pub mod session;
pub mod state;
pub mod views;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use survey_auth::TokenValidator;
use tokio::task::JoinHandle;
use tracing::info;

pub use config::{FormLimits, OidcConfig, WebConfig};
pub use state::WebState;

use clients::{AccountService, QuestionService, SurveyService, SurveysApiClient};
use oidc::OidcClient;
use session::SessionStore;

/// The web front-end: state shared by every page.
pub struct WebApp {
    state: WebState,
}

impl WebApp {
    /// Front-end calling the surveys API at `config.api_base_url`.
    pub fn new(config: WebConfig, validator: Arc<dyn TokenValidator>) -> anyhow::Result<Self> {
        info!(api = %config.api_base_url, "Initializing survey web front-end");

        let client = Arc::new(SurveysApiClient::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?);
        Self::with_services(
            config,
            Arc::clone(&client) as Arc<dyn SurveyService>,
            Arc::clone(&client) as Arc<dyn QuestionService>,
            client,
            validator,
        )
    }

    /// Front-end over arbitrary service implementations.
    pub fn with_services(
        config: WebConfig,
        surveys: Arc<dyn SurveyService>,
        questions: Arc<dyn QuestionService>,
        accounts: Arc<dyn AccountService>,
        validator: Arc<dyn TokenValidator>,
    ) -> anyhow::Result<Self> {
        let oidc = OidcClient::new(&config)?;
        Ok(Self {
            state: WebState {
                surveys,
                questions,
                accounts,
                sessions: Arc::new(SessionStore::new()),
                oidc: Arc::new(oidc),
                validator,
                config: Arc::new(config),
            },
        })
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<SessionStore> {
        Arc::clone(&self.state.sessions)
    }

    pub fn router(&self) -> Router {
        controllers::router(self.state.clone())
    }

    /// Periodically evict expired sessions and stale sign-in attempts.
    #[must_use]
    pub fn spawn_session_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let sessions = self.sessions();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let purged = sessions.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, "expired sessions purged");
                }
            }
        })
    }
}
