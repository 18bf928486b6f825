use crate::{claims::Claims, errors::AuthError};

/// Tenant administrator: manages every survey in the tenant.
pub const SURVEY_ADMIN: &str = "SurveyAdmin";

/// May create surveys.
pub const SURVEY_CREATOR: &str = "SurveyCreator";

/// Route-level authorization policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    RequireSurveyCreator,
    RequireSurveyAdmin,
}

impl Policy {
    /// Roles any of which satisfies the policy
    #[must_use]
    pub fn roles(self) -> &'static [&'static str] {
        match self {
            Policy::RequireSurveyCreator => &[SURVEY_CREATOR, SURVEY_ADMIN],
            Policy::RequireSurveyAdmin => &[SURVEY_ADMIN],
        }
    }

    #[must_use]
    pub fn is_satisfied_by(self, claims: &Claims) -> bool {
        claims.has_any_role(self.roles())
    }

    /// # Errors
    /// Returns `AuthError::Forbidden` when the claims carry none of the policy roles.
    pub fn check(self, claims: &Claims) -> Result<(), AuthError> {
        if self.is_satisfied_by(claims) {
            Ok(())
        } else {
            tracing::debug!(policy = ?self, object_id = %claims.object_id, "policy denied");
            Err(AuthError::Forbidden)
        }
    }
}
