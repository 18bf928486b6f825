use thiserror::Error;

use crate::errors::AuthError;

/// Errors that can occur during JWT claims validation and processing
#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("Invalid signature or key")]
    InvalidSignature,

    #[error("Invalid issuer: expected one of {expected:?}, got {actual}")]
    InvalidIssuer {
        expected: Vec<String>,
        actual: String,
    },

    #[error("Invalid audience: expected one of {expected:?}, got {actual:?}")]
    InvalidAudience {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Token expired")]
    Expired,

    #[error("Token not yet valid (nbf check failed)")]
    NotYetValid,

    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    #[error("Invalid claim format: {field} - {reason}")]
    InvalidClaimFormat { field: String, reason: String },

    #[error("Unexpected signing algorithm: {0}")]
    UnexpectedAlgorithm(String),

    #[error("JWT decode failed: {0}")]
    DecodeFailed(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<ClaimsError> for AuthError {
    fn from(err: ClaimsError) -> Self {
        match err {
            ClaimsError::Expired => AuthError::TokenExpired,
            ClaimsError::InvalidSignature => AuthError::InvalidToken("Invalid signature".into()),
            ClaimsError::InvalidIssuer { expected, actual } => AuthError::IssuerMismatch {
                expected: expected.join(", "),
                actual,
            },
            ClaimsError::InvalidAudience { expected, actual } => {
                AuthError::AudienceMismatch { expected, actual }
            }
            ClaimsError::ConfigError(msg) => AuthError::Internal(msg),
            other => AuthError::ValidationFailed(other.to_string()),
        }
    }
}
