use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header, errors::ErrorKind};
use serde_json::Value;

use crate::{
    claims::Claims,
    claims_error::ClaimsError,
    config::{AuthConfig, KeyConfig},
    errors::AuthError,
    mapper::ClaimsMapper,
    traits::TokenValidator,
    validation::{ValidationConfig, validate_claims},
};

/// Validates signed JWT access tokens against a single configured key.
pub struct JwtValidator {
    key: DecodingKey,
    algorithm: Algorithm,
    mapper: ClaimsMapper,
    validation: ValidationConfig,
}

impl std::fmt::Debug for JwtValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtValidator")
            .field("algorithm", &self.algorithm)
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtValidator {
    /// Build a validator from configuration.
    ///
    /// # Errors
    /// Returns `ClaimsError::ConfigError` when the key is missing or cannot be parsed.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ClaimsError> {
        let (key, algorithm) = match &config.key {
            KeyConfig::Hmac { secret } => {
                if secret.is_empty() {
                    return Err(ClaimsError::ConfigError(
                        "auth.key.secret must be set for hmac keys".to_owned(),
                    ));
                }
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            KeyConfig::RsaPem { public_key_pem } => {
                let key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
                    .map_err(|e| ClaimsError::ConfigError(format!("invalid RSA key: {e}")))?;
                (key, Algorithm::RS256)
            }
        };

        Ok(Self {
            key,
            algorithm,
            mapper: ClaimsMapper::new(config.claims.clone()),
            validation: config.validation(),
        })
    }

    fn decode_raw(&self, token: &str) -> Result<Value, ClaimsError> {
        let header =
            decode_header(token).map_err(|e| ClaimsError::DecodeFailed(e.to_string()))?;
        if header.alg != self.algorithm {
            return Err(ClaimsError::UnexpectedAlgorithm(format!("{:?}", header.alg)));
        }

        // Time and audience checks run on the normalized claims with the configured leeway.
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<Value>(token, &self.key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => ClaimsError::InvalidSignature,
                _ => ClaimsError::DecodeFailed(e.to_string()),
            })
    }
}

#[async_trait]
impl TokenValidator for JwtValidator {
    async fn validate_and_parse(&self, token: &str) -> Result<Claims, AuthError> {
        let raw = self.decode_raw(token)?;
        let claims = self.mapper.normalize(&raw)?;
        validate_claims(&claims, &self.validation)?;
        Ok(claims)
    }
}
