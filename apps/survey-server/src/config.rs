//! Layered application configuration.
//!
//! Defaults, then an optional YAML file, then `SURVEYS__SECTION__KEY`
//! environment variables, then command-line overrides.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result, bail};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use survey_auth::AuthConfig;
use survey_web::{FormLimits, WebConfig};
use surveys::SurveysConfig;
use url::Url;

pub const ENV_PREFIX: &str = "SURVEYS__";
pub const MOCK_DSN: &str = "sqlite::memory:";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub surveys: SurveysConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address of the REST API
    pub api_bind: SocketAddr,
    /// Listen address of the web front-end
    pub web_bind: SocketAddr,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_bind: SocketAddr::from(([127, 0, 0, 1], 8087)),
            web_bind: SocketAddr::from(([127, 0, 0, 1], 8088)),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// `sqlite://…` or `postgres://…`
    pub dsn: String,
    pub max_conns: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite://surveys.db?mode=rwc".to_owned(),
            max_conns: 10,
            acquire_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `info` or `surveys=debug,info`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

/// Command-line settings that take precedence over every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_port: Option<u16>,
    pub web_port: Option<u16>,
    pub mock: bool,
}

impl AppConfig {
    /// Provider chain without CLI overrides.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config: Self = Self::figment(path)
            .extract()
            .context("failed to load configuration")?;
        config.share_form_limits();
        Ok(config)
    }

    /// The web forms check the same limits the API enforces.
    fn share_form_limits(&mut self) {
        self.web.limits = FormLimits {
            max_title_length: self.surveys.max_title_length,
            max_question_length: self.surveys.max_question_length,
            max_possible_answers: self.surveys.max_possible_answers,
        };
    }

    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(port) = cli.api_port {
            let old = self.server.api_bind.port();
            self.server.api_bind.set_port(port);
            repoint_local(&mut self.web.api_base_url, old, port);
        }
        if let Some(port) = cli.web_port {
            let old = self.server.web_bind.port();
            self.server.web_bind.set_port(port);
            repoint_local(&mut self.web.public_base_url, old, port);
        }
        if cli.mock {
            self.database.dsn = MOCK_DSN.to_owned();
        }
    }

    /// Checks that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.database.dsn.trim().is_empty() {
            bail!("database.dsn must be set");
        }
        if self.database.max_conns == 0 {
            bail!("database.max_conns must be at least 1");
        }
        if self.server.api_bind == self.server.web_bind {
            bail!("server.api_bind and server.web_bind must differ");
        }
        Url::parse(&self.web.api_base_url).context("web.api_base_url is not a valid URL")?;
        Url::parse(&self.web.public_base_url).context("web.public_base_url is not a valid URL")?;
        if !self.web.oidc.redirect_path.starts_with('/') {
            bail!("web.oidc.redirect_path must start with '/'");
        }
        Ok(())
    }

    /// Effective configuration as JSON; secrets are omitted and DSN passwords masked.
    pub fn to_redacted_json(&self) -> Result<String> {
        let mut shown = self.clone();
        shown.database.dsn = redact_dsn_password(&self.database.dsn)?;
        serde_json::to_string_pretty(&shown).context("failed to serialize configuration")
    }
}

/// Follow a port change when `url` points at the local listener on `old`.
fn repoint_local(url: &mut String, old: u16, new: u16) {
    let Ok(mut parsed) = Url::parse(url) else {
        return;
    };
    let local = matches!(parsed.host_str(), Some("127.0.0.1" | "localhost" | "[::1]"));
    if local && parsed.port_or_known_default() == Some(old) && parsed.set_port(Some(new)).is_ok() {
        let mut value = parsed.to_string();
        if !url.ends_with('/') && value.ends_with('/') && parsed.path() == "/" {
            value.pop();
        }
        *url = value;
    }
}

pub fn redact_dsn_password(dsn: &str) -> Result<String> {
    if !dsn.contains('@') {
        return Ok(dsn.to_owned());
    }
    let mut parsed = Url::parse(dsn).context("database.dsn is not a valid URL")?;
    if parsed.password().is_some() && parsed.set_password(Some("***")).is_err() {
        bail!("cannot redact database.dsn");
    }
    Ok(parsed.to_string())
}
