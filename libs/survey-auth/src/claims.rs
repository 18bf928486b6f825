use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Normalized identity claims of a signed-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer - the `iss` claim. Identifies the directory tenant that signed the token.
    pub issuer: String,

    /// Subject - the `sub` claim
    pub subject: String,

    /// Audiences - the `aud` claim
    pub audiences: Vec<String>,

    /// Expiration time - the `exp` claim
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub expires_at: Option<OffsetDateTime>,

    /// Not before time - the `nbf` claim
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub not_before: Option<OffsetDateTime>,

    /// Directory tenant id (`tid` by default)
    pub tenant_id: String,

    /// Stable user id within the directory (`oid` by default)
    pub object_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application roles
    #[serde(default)]
    pub roles: Vec<String>,

    /// Additional provider-specific claims
    #[serde(flatten)]
    pub extras: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// Check if the token has expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|exp| OffsetDateTime::now_utc() >= exp)
    }

    /// Check if the token is valid yet (nbf check)
    #[must_use]
    pub fn is_valid_yet(&self) -> bool {
        self.not_before
            .is_none_or(|nbf| OffsetDateTime::now_utc() >= nbf)
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    #[must_use]
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    /// Name to show for the user, falling back to the email and then the object id
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.object_id)
    }
}
