use crate::{claims::Claims, claims_error::ClaimsError};
use time::OffsetDateTime;

/// Configuration for common validation
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Allowed issuers (if empty, any issuer is accepted)
    pub allowed_issuers: Vec<String>,

    /// Allowed audiences (if empty, any audience is accepted)
    pub allowed_audiences: Vec<String>,

    /// Leeway in seconds for time-based validations (exp, nbf)
    pub leeway_seconds: i64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allowed_issuers: vec![],
            allowed_audiences: vec![],
            leeway_seconds: 60,
        }
    }
}

/// Perform common validation checks on claims.
///
/// # Errors
/// Returns `ClaimsError` if any validation check fails (issuer, audience, expiration, etc.).
pub fn validate_claims(claims: &Claims, config: &ValidationConfig) -> Result<(), ClaimsError> {
    // 1. Validate issuer
    if !config.allowed_issuers.is_empty() && !config.allowed_issuers.contains(&claims.issuer) {
        return Err(ClaimsError::InvalidIssuer {
            expected: config.allowed_issuers.clone(),
            actual: claims.issuer.clone(),
        });
    }

    // 2. Validate audience (at least one must match)
    if !config.allowed_audiences.is_empty() {
        let has_valid_audience = claims
            .audiences
            .iter()
            .any(|aud| config.allowed_audiences.contains(aud));

        if !has_valid_audience {
            return Err(ClaimsError::InvalidAudience {
                expected: config.allowed_audiences.clone(),
                actual: claims.audiences.clone(),
            });
        }
    }

    let now = OffsetDateTime::now_utc();
    let leeway = time::Duration::seconds(config.leeway_seconds);

    // 3. Validate expiration with leeway
    if let Some(exp) = claims.expires_at
        && now > exp + leeway
    {
        return Err(ClaimsError::Expired);
    }

    // 4. Validate not-before with leeway
    if let Some(nbf) = claims.not_before
        && now < nbf - leeway
    {
        return Err(ClaimsError::NotYetValid);
    }

    Ok(())
}

/// Helper to parse timestamp (seconds since epoch) into `OffsetDateTime`.
///
/// # Errors
/// Returns `ClaimsError::InvalidClaimFormat` if the value is not a valid unix timestamp.
pub fn parse_timestamp(
    value: &serde_json::Value,
    field_name: &str,
) -> Result<OffsetDateTime, ClaimsError> {
    let ts = value
        .as_i64()
        .ok_or_else(|| ClaimsError::InvalidClaimFormat {
            field: field_name.to_owned(),
            reason: "must be a number (unix timestamp)".to_owned(),
        })?;

    OffsetDateTime::from_unix_timestamp(ts).map_err(|_| ClaimsError::InvalidClaimFormat {
        field: field_name.to_owned(),
        reason: "invalid unix timestamp".to_owned(),
    })
}

/// Helper to extract string from JSON value.
///
/// # Errors
/// Returns `ClaimsError::MissingClaim` if the value is not a string.
pub fn extract_string(value: &serde_json::Value, field_name: &str) -> Result<String, ClaimsError> {
    value
        .as_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| ClaimsError::MissingClaim(field_name.to_owned()))
}

/// Helper to extract string array from JSON value (handles both string and array)
#[must_use]
pub fn extract_string_list(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::String(s) => vec![s.clone()],
        serde_json::Value::Array(arr) => arr
            .iter()
            .filter_map(|v| v.as_str().map(ToOwned::to_owned))
            .collect(),
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_claims() -> Claims {
        Claims {
            issuer: "https://test.example.com".to_owned(),
            subject: "sub".to_owned(),
            audiences: vec!["api".to_owned()],
            expires_at: Some(OffsetDateTime::now_utc() + time::Duration::hours(1)),
            not_before: None,
            tenant_id: "tenant".to_owned(),
            object_id: "oid".to_owned(),
            email: None,
            name: None,
            roles: vec![],
            extras: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_valid_claims_pass() {
        let claims = create_test_claims();
        let config = ValidationConfig {
            allowed_issuers: vec!["https://test.example.com".to_owned()],
            allowed_audiences: vec!["api".to_owned()],
            ..Default::default()
        };

        assert!(validate_claims(&claims, &config).is_ok());
    }

    #[test]
    fn test_invalid_issuer_fails() {
        let claims = create_test_claims();
        let config = ValidationConfig {
            allowed_issuers: vec!["https://other.example.com".to_owned()],
            ..Default::default()
        };

        let result = validate_claims(&claims, &config);
        assert!(matches!(result, Err(ClaimsError::InvalidIssuer { .. })));
    }

    #[test]
    fn test_invalid_audience_fails() {
        let claims = create_test_claims();
        let config = ValidationConfig {
            allowed_audiences: vec!["other-api".to_owned()],
            ..Default::default()
        };

        let result = validate_claims(&claims, &config);
        assert!(matches!(result, Err(ClaimsError::InvalidAudience { .. })));
    }

    #[test]
    fn test_expired_token_fails() {
        let mut claims = create_test_claims();
        claims.expires_at = Some(OffsetDateTime::now_utc() - time::Duration::hours(1));

        let result = validate_claims(&claims, &ValidationConfig::default());
        assert!(matches!(result, Err(ClaimsError::Expired)));
    }

    #[test]
    fn test_not_yet_valid_fails() {
        let mut claims = create_test_claims();
        claims.not_before = Some(OffsetDateTime::now_utc() + time::Duration::hours(1));

        let result = validate_claims(&claims, &ValidationConfig::default());
        assert!(matches!(result, Err(ClaimsError::NotYetValid)));
    }

    #[test]
    fn test_leeway_allows_expired() {
        let mut claims = create_test_claims();
        claims.expires_at = Some(OffsetDateTime::now_utc() - time::Duration::seconds(30));

        assert!(validate_claims(&claims, &ValidationConfig::default()).is_ok());
    }

    #[test]
    fn test_extract_string_list() {
        assert_eq!(extract_string_list(&json!("api")), vec!["api"]);
        assert_eq!(extract_string_list(&json!(["api", "ui"])), vec!["api", "ui"]);
        assert!(extract_string_list(&json!(42)).is_empty());
    }

    #[test]
    fn test_parse_timestamp_rejects_strings() {
        let result = parse_timestamp(&json!("tomorrow"), "exp");
        assert!(matches!(
            result,
            Err(ClaimsError::InvalidClaimFormat { .. })
        ));
    }
}
