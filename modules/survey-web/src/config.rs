use serde::{Deserialize, Serialize};

/// Web front-end configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebConfig {
    /// Base URL of the surveys REST API
    pub api_base_url: String,
    /// Externally visible base URL of this web app, used for redirect URIs
    pub public_base_url: String,
    pub oidc: OidcConfig,
    /// Session lifetime in seconds
    pub session_ttl_secs: u64,
    pub cookie_name: String,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
    /// Timeout for calls to the API and the identity provider
    pub request_timeout_secs: u64,
    /// Mirrors the API's validation limits; set by the host, not configured here
    #[serde(skip)]
    pub limits: FormLimits,
}

/// Input limits checked by the forms before calling the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLimits {
    pub max_title_length: usize,
    pub max_question_length: usize,
    pub max_possible_answers: usize,
}

impl Default for FormLimits {
    fn default() -> Self {
        Self {
            max_title_length: 256,
            max_question_length: 1024,
            max_possible_answers: 20,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8087".to_owned(),
            public_base_url: "http://127.0.0.1:8088".to_owned(),
            oidc: OidcConfig::default(),
            session_ttl_secs: 8 * 60 * 60,
            cookie_name: "surveys_session".to_owned(),
            secure_cookies: false,
            request_timeout_secs: 30,
            limits: FormLimits::default(),
        }
    }
}

/// OpenID Connect authorization-code client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OidcConfig {
    pub authorize_endpoint: String,
    pub token_endpoint: String,
    /// Optional RP-initiated logout endpoint
    pub end_session_endpoint: Option<String>,
    pub client_id: String,
    #[serde(default, skip_serializing)]
    pub client_secret: String,
    /// Scopes requested in addition to `openid profile email`
    pub scopes: Vec<String>,
    /// Callback path registered with the identity provider
    pub redirect_path: String,
}

impl Default for OidcConfig {
    fn default() -> Self {
        Self {
            authorize_endpoint: String::new(),
            token_endpoint: String::new(),
            end_session_endpoint: None,
            client_id: String::new(),
            client_secret: String::new(),
            scopes: Vec::new(),
            redirect_path: "/signin-oidc".to_owned(),
        }
    }
}

impl WebConfig {
    /// Absolute callback URL handed to the identity provider.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        format!(
            "{}{}",
            self.public_base_url.trim_end_matches('/'),
            self.oidc.redirect_path
        )
    }
}
