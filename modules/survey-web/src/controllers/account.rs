use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::clients::ServiceError;
use crate::session::{self, Session};
use crate::state::{MaybeSignedIn, WebState};
use crate::views;

#[tracing::instrument(name = "web.account.signin", skip(state))]
pub async fn signin(State(state): State<WebState>) -> Response {
    redirect_to_provider(&state, false)
}

/// Sign-up registers the caller's organization as a tenant once consent is given.
#[tracing::instrument(name = "web.account.signup", skip(state))]
pub async fn signup(State(state): State<WebState>) -> Response {
    redirect_to_provider(&state, true)
}

fn redirect_to_provider(state: &WebState, signup: bool) -> Response {
    let auth_state = state.sessions.begin_auth(signup);
    match state.oidc.authorize_url(&auth_state, signup) {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "cannot build authorization URL");
            (StatusCode::INTERNAL_SERVER_ERROR, views::error(None)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[tracing::instrument(name = "web.account.callback", skip_all)]
pub async fn callback(State(state): State<WebState>, Query(query): Query<CallbackQuery>) -> Response {
    if let Some(error) = &query.error {
        tracing::warn!(
            %error,
            description = query.error_description.as_deref().unwrap_or_default(),
            "identity provider returned an error"
        );
        return (StatusCode::BAD_REQUEST, views::error(None)).into_response();
    }

    let pending = query
        .state
        .as_deref()
        .and_then(|s| state.sessions.complete_auth(s));
    let (Some(pending), Some(code)) = (pending, query.code.as_deref()) else {
        tracing::warn!("sign-in callback with unknown state or without code");
        return (StatusCode::BAD_REQUEST, views::error(None)).into_response();
    };

    let tokens = match state.oidc.exchange_code(code).await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::error!(error = %e, "authorization code exchange failed");
            return (StatusCode::BAD_GATEWAY, views::error(None)).into_response();
        }
    };
    let token = tokens.access_token;

    let claims = match state.validator.validate_and_parse(token.expose_secret()).await {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(error = %e, "access token from identity provider rejected");
            return (StatusCode::FORBIDDEN, views::access_denied(None)).into_response();
        }
    };

    if pending.signup {
        match state.accounts.register_tenant(&token).await {
            Ok(tenant) => tracing::info!(tenant_id = %tenant.id, "tenant signed up"),
            Err(ServiceError::Conflict { .. }) => {
                tracing::debug!(issuer = %claims.issuer, "tenant already registered");
            }
            Err(e) => return failure(&e),
        }
    }

    let profile = match state.accounts.current_user(&token).await {
        Ok(profile) => profile,
        Err(e) => return failure(&e),
    };

    // The session ends with the access token if that expires first.
    let ttl = Duration::from_secs(state.config.session_ttl_secs);
    let lifetime = tokens.expires_in.map_or(ttl, |expiry| expiry.min(ttl));
    let expires_at = OffsetDateTime::now_utc() + lifetime;

    let session = Session {
        access_token: token,
        user_id: profile.id,
        tenant_id: profile.tenant_id,
        email: profile.email,
        display_name: profile.display_name,
        roles: claims.roles,
        expires_at,
    };
    let user_id = session.user_id;
    let id = state.sessions.insert(session);
    tracing::info!(%user_id, signup = pending.signup, "user signed in");

    let mut response = Redirect::to("/surveys").into_response();
    if let Some(cookie) = session::session_cookie(
        &state.config.cookie_name,
        &id,
        lifetime,
        state.config.secure_cookies,
    ) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

/// Failure before a session exists.
fn failure(err: &ServiceError) -> Response {
    match err {
        ServiceError::Forbidden | ServiceError::Unauthorized => {
            tracing::info!(error = %err, "sign-in refused by surveys API");
            (StatusCode::FORBIDDEN, views::access_denied(None)).into_response()
        }
        other => {
            tracing::error!(error = %other, "sign-in failed");
            (StatusCode::INTERNAL_SERVER_ERROR, views::error(None)).into_response()
        }
    }
}

#[tracing::instrument(name = "web.account.signout", skip_all)]
pub async fn signout(
    State(state): State<WebState>,
    headers: axum::http::HeaderMap,
) -> Response {
    if let Some(id) = session::cookie_value(&headers, &state.config.cookie_name)
        && let Some(session) = state.sessions.remove(id)
    {
        tracing::info!(user_id = %session.user_id, "user signed out");
    }

    let home = format!("{}/", state.config.public_base_url.trim_end_matches('/'));
    let target = state
        .oidc
        .end_session_url(&home)
        .map_or_else(|| "/".to_owned(), |url| url.to_string());

    let mut response = Redirect::to(&target).into_response();
    if let Some(cookie) = session::clear_cookie(&state.config.cookie_name) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

pub async fn home(MaybeSignedIn(session): MaybeSignedIn) -> Response {
    views::home(session.as_deref()).into_response()
}
