//! OpenID Connect authorization-code flow against the identity provider.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::WebConfig;

const BASE_SCOPES: &str = "openid profile email";

#[derive(Error, Debug)]
pub enum OidcError {
    #[error("invalid identity provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint returned {status}: {body}")]
    TokenEndpoint { status: u16, body: String },
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Tokens issued for a completed sign-in.
#[derive(Debug)]
pub struct IssuedTokens {
    pub access_token: SecretString,
    pub expires_in: Option<Duration>,
}

pub struct OidcClient {
    http: Client,
    authorize_endpoint: String,
    token_endpoint: String,
    end_session_endpoint: Option<String>,
    client_id: String,
    client_secret: SecretString,
    scope: String,
    redirect_uri: String,
}

impl OidcClient {
    pub fn new(config: &WebConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let mut scope = BASE_SCOPES.to_owned();
        for extra in &config.oidc.scopes {
            scope.push(' ');
            scope.push_str(extra);
        }

        Ok(Self {
            http,
            authorize_endpoint: config.oidc.authorize_endpoint.clone(),
            token_endpoint: config.oidc.token_endpoint.clone(),
            end_session_endpoint: config.oidc.end_session_endpoint.clone(),
            client_id: config.oidc.client_id.clone(),
            client_secret: SecretString::from(config.oidc.client_secret.clone()),
            scope,
            redirect_uri: config.redirect_uri(),
        })
    }

    /// Authorization endpoint URL for a new sign-in.
    ///
    /// Sign-up additionally requests administrator consent for the tenant.
    pub fn authorize_url(&self, state: &str, signup: bool) -> Result<Url, OidcError> {
        let mut params = vec![
            ("client_id", self.client_id.as_str()),
            ("response_type", "code"),
            ("response_mode", "query"),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("scope", self.scope.as_str()),
            ("state", state),
        ];
        if signup {
            params.push(("prompt", "admin_consent"));
        }
        Ok(Url::parse_with_params(&self.authorize_endpoint, &params)?)
    }

    /// Redeem an authorization code at the token endpoint.
    pub async fn exchange_code(&self, code: &str) -> Result<IssuedTokens, OidcError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
        ];

        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OidcError::TokenEndpoint {
                status: status.as_u16(),
                body,
            });
        }

        let tokens: TokenResponse = response.json().await?;
        Ok(IssuedTokens {
            access_token: SecretString::from(tokens.access_token),
            expires_in: tokens.expires_in.map(Duration::from_secs),
        })
    }

    /// Where to send the browser after the local session is dropped.
    pub fn end_session_url(&self, post_logout_redirect: &str) -> Option<Url> {
        let endpoint = self.end_session_endpoint.as_deref()?;
        Url::parse_with_params(
            endpoint,
            &[("post_logout_redirect_uri", post_logout_redirect)],
        )
        .map_err(|e| tracing::warn!(error = %e, "invalid end-session endpoint"))
        .ok()
    }
}
