//! Request extractors resolving the authenticated caller.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use survey_auth::axum_ext::AuthClaims;

use crate::api::rest::problem::Problem;
use crate::domain::model::Caller;
use crate::module::ConcreteAppServices;

/// Caller of the request, resolved from the validated claims.
///
/// Provisions the user on first use. Rejects with 403 when the token issuer
/// is not a registered tenant.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Caller);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthClaims(claims) = AuthClaims::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let svc = services(parts)?;

        svc.identity
            .resolve(&claims)
            .await
            .map(CurrentUser)
            .map_err(|e| Problem::from(e).into_response())
    }
}

fn services(parts: &Parts) -> Result<Arc<ConcreteAppServices>, Response> {
    parts
        .extensions
        .get::<Arc<ConcreteAppServices>>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("surveys services extension is missing");
            Problem::internal().into_response()
        })
}
