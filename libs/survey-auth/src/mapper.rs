use serde_json::Value;

use crate::{
    claims::Claims,
    claims_error::ClaimsError,
    config::ClaimNames,
    validation::{extract_string, extract_string_list, parse_timestamp},
};

/// Maps a decoded OIDC token payload onto [`Claims`] using configurable claim names.
#[derive(Debug, Clone, Default)]
pub struct ClaimsMapper {
    names: ClaimNames,
}

impl ClaimsMapper {
    #[must_use]
    pub fn new(names: ClaimNames) -> Self {
        Self { names }
    }

    fn required(&self, raw: &Value, field: &str) -> Result<String, ClaimsError> {
        let value = raw
            .get(field)
            .ok_or_else(|| ClaimsError::MissingClaim(field.to_owned()))
            .and_then(|v| extract_string(v, field))?;
        if value.is_empty() {
            return Err(ClaimsError::InvalidClaimFormat {
                field: field.to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }
        Ok(value)
    }

    fn optional(raw: &Value, field: &str) -> Option<String> {
        raw.get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
    }

    /// Normalize a raw payload into claims.
    ///
    /// # Errors
    /// Returns `ClaimsError` when a required claim is missing or malformed.
    pub fn normalize(&self, raw: &Value) -> Result<Claims, ClaimsError> {
        let issuer = self.required(raw, "iss")?;
        let tenant_id = self.required(raw, &self.names.tenant)?;
        let object_id = self.required(raw, &self.names.object_id)?;
        let subject = Self::optional(raw, "sub").unwrap_or_else(|| object_id.clone());

        let audiences = raw.get("aud").map(extract_string_list).unwrap_or_default();

        let expires_at = raw
            .get("exp")
            .map(|v| parse_timestamp(v, "exp"))
            .transpose()?;

        let not_before = raw
            .get("nbf")
            .map(|v| parse_timestamp(v, "nbf"))
            .transpose()?;

        let email = self
            .names
            .email
            .iter()
            .find_map(|field| Self::optional(raw, field));
        let name = Self::optional(raw, &self.names.name);

        let roles = raw
            .get(&self.names.roles)
            .map(extract_string_list)
            .unwrap_or_default();

        let mut extras = serde_json::Map::new();
        if let Value::Object(obj) = raw {
            for (key, value) in obj {
                if !self.is_mapped(key) {
                    extras.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(Claims {
            issuer,
            subject,
            audiences,
            expires_at,
            not_before,
            tenant_id,
            object_id,
            email,
            name,
            roles,
            extras,
        })
    }

    fn is_mapped(&self, key: &str) -> bool {
        ["iss", "sub", "aud", "exp", "nbf"].contains(&key)
            || key == self.names.tenant
            || key == self.names.object_id
            || key == self.names.roles
            || key == self.names.name
            || self.names.email.iter().any(|field| field == key)
    }
}
