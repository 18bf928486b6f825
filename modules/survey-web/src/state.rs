//! Shared state and request extractors of the web front-end.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use survey_auth::TokenValidator;

use crate::clients::{AccountService, QuestionService, ServiceError, SurveyService};
use crate::config::WebConfig;
use crate::oidc::OidcClient;
use crate::session::{self, Session, SessionStore};
use crate::views;

pub const SIGNIN_PATH: &str = "/account/signin";

#[derive(Clone)]
pub struct WebState {
    pub surveys: Arc<dyn SurveyService>,
    pub questions: Arc<dyn QuestionService>,
    pub accounts: Arc<dyn AccountService>,
    pub sessions: Arc<SessionStore>,
    pub oidc: Arc<OidcClient>,
    pub validator: Arc<dyn TokenValidator>,
    pub config: Arc<WebConfig>,
}

/// Handler result; both arms are complete pages or redirects.
pub type Page = Result<Response, Response>;

/// A request carrying a live session cookie.
///
/// Requests without one are redirected to the sign-in route.
pub struct SignedIn {
    pub session: Arc<Session>,
    id: String,
    sessions: Arc<SessionStore>,
    cookie_name: String,
}

impl FromRequestParts<WebState> for SignedIn {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &WebState,
    ) -> Result<Self, Self::Rejection> {
        let cookie_name = &state.config.cookie_name;
        let found = session::cookie_value(&parts.headers, cookie_name)
            .and_then(|id| state.sessions.get(id).map(|s| (id.to_owned(), s)));

        match found {
            Some((id, session)) => Ok(Self {
                session,
                id,
                sessions: Arc::clone(&state.sessions),
                cookie_name: cookie_name.clone(),
            }),
            None => Err(Redirect::to(SIGNIN_PATH).into_response()),
        }
    }
}

impl SignedIn {
    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.session.access_token
    }

    /// Render a failed API call.
    pub fn fail(&self, err: ServiceError) -> Response {
        match err {
            ServiceError::Forbidden => (
                StatusCode::FORBIDDEN,
                views::access_denied(Some(&self.session)),
            )
                .into_response(),
            ServiceError::NotFound => {
                (StatusCode::NOT_FOUND, views::not_found(Some(&self.session))).into_response()
            }
            ServiceError::Unauthorized => {
                tracing::info!(user_id = %self.session.user_id, "access token rejected, signing out");
                self.sessions.remove(&self.id);
                let mut response = Redirect::to(SIGNIN_PATH).into_response();
                if let Some(cookie) = session::clear_cookie(&self.cookie_name) {
                    response.headers_mut().insert(header::SET_COOKIE, cookie);
                }
                response
            }
            ServiceError::Conflict { message } => {
                tracing::warn!(%message, "unexpected conflict from surveys API");
                self.error_page()
            }
            ServiceError::Invalid { message } => {
                tracing::warn!(%message, "surveys API rejected input");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    views::error(Some(&self.session)),
                )
                    .into_response()
            }
            ServiceError::Unexpected(message) => {
                tracing::error!(%message, "surveys API call failed");
                self.error_page()
            }
        }
    }

    fn error_page(&self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            views::error(Some(&self.session)),
        )
            .into_response()
    }
}

/// The session if the request carries one; never rejects.
pub struct MaybeSignedIn(pub Option<Arc<Session>>);

impl FromRequestParts<WebState> for MaybeSignedIn {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &WebState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(
            session::cookie_value(&parts.headers, &state.config.cookie_name)
                .and_then(|id| state.sessions.get(id)),
        ))
    }
}
