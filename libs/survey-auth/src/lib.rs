//! Authentication for the surveys services.
//!
//! Access tokens issued by an external OpenID-Connect provider are validated
//! and normalized into [`Claims`]. Route-level [`Policy`] checks cover the two
//! application roles; per-resource checks live with the resources.

pub mod claims;
pub mod claims_error;
pub mod config;
pub mod errors;
pub mod jwt;
pub mod mapper;
pub mod roles;
pub mod traits;
pub mod validation;

#[cfg(feature = "axum-ext")]
pub mod axum_ext;

pub use claims::Claims;
pub use claims_error::ClaimsError;
pub use config::{AuthConfig, ClaimNames, KeyConfig};
pub use errors::AuthError;
pub use jwt::JwtValidator;
pub use mapper::ClaimsMapper;
pub use roles::{Policy, SURVEY_ADMIN, SURVEY_CREATOR};
pub use traits::TokenValidator;
pub use validation::ValidationConfig;
