use serde::{Deserialize, Serialize};

use crate::validation::ValidationConfig;

/// Main authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Leeway in seconds for time-based validations (exp, nbf)
    #[serde(default = "default_leeway")]
    pub leeway_seconds: i64,

    /// Allowed issuers (if empty, any issuer is accepted)
    #[serde(default)]
    pub issuers: Vec<String>,

    /// Allowed audiences (if empty, any audience is accepted)
    #[serde(default)]
    pub audiences: Vec<String>,

    /// Token signature verification key
    #[serde(default)]
    pub key: KeyConfig,

    /// Names of the identity claims in the provider's tokens
    #[serde(default)]
    pub claims: ClaimNames,
}

fn default_leeway() -> i64 {
    60
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            leeway_seconds: 60,
            issuers: Vec::new(),
            audiences: Vec::new(),
            key: KeyConfig::default(),
            claims: ClaimNames::default(),
        }
    }
}

impl AuthConfig {
    #[must_use]
    pub fn validation(&self) -> ValidationConfig {
        ValidationConfig {
            allowed_issuers: self.issuers.clone(),
            allowed_audiences: self.audiences.clone(),
            leeway_seconds: self.leeway_seconds,
        }
    }
}

/// Signature verification key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KeyConfig {
    /// Shared secret, HS256
    Hmac {
        #[serde(default, skip_serializing)]
        secret: String,
    },
    /// Provider public key in PEM form, RS256
    RsaPem { public_key_pem: String },
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self::Hmac {
            secret: String::new(),
        }
    }
}

/// Claim field names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimNames {
    /// Directory tenant claim (default: "tid")
    pub tenant: String,
    /// User object id claim (default: "oid")
    pub object_id: String,
    /// Roles claim (default: "roles")
    pub roles: String,
    /// Email claims tried in order (default: "email", "preferred_username", "upn")
    pub email: Vec<String>,
    /// Display name claim (default: "name")
    pub name: String,
}

impl Default for ClaimNames {
    fn default() -> Self {
        Self {
            tenant: "tid".to_owned(),
            object_id: "oid".to_owned(),
            roles: "roles".to_owned(),
            email: vec![
                "email".to_owned(),
                "preferred_username".to_owned(),
                "upn".to_owned(),
            ],
            name: "name".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let cfg: AuthConfig = serde_json::from_value(serde_json::json!({
            "issuers": ["https://login.example.com/contoso/"],
            "key": { "type": "hmac", "secret": "s3cr3t" }
        }))
        .unwrap();

        assert_eq!(cfg.leeway_seconds, 60);
        assert_eq!(cfg.claims.tenant, "tid");
        assert!(matches!(cfg.key, KeyConfig::Hmac { ref secret } if secret == "s3cr3t"));
    }

    #[test]
    fn test_secret_is_not_serialized() {
        let cfg = AuthConfig {
            key: KeyConfig::Hmac {
                secret: "s3cr3t".to_owned(),
            },
            ..AuthConfig::default()
        };

        let dumped = serde_json::to_string(&cfg).unwrap();
        assert!(!dumped.contains("s3cr3t"));
    }
}
