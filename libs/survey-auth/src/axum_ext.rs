//! Axum extractors and middleware for auth

use crate::{claims::Claims, errors::AuthError, roles::Policy, traits::TokenValidator};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, Method, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Extractor for Claims - validates that auth middleware has run
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthClaims)
            .ok_or(AuthError::Internal(
                "Claims not found - auth middleware not configured".to_owned(),
            ))
    }
}

/// Bearer-token authentication middleware.
///
/// Validates the `Authorization: Bearer` token and inserts the resulting
/// [`Claims`] into the request extensions. CORS preflight requests pass through.
pub async fn authenticate(
    State(validator): State<Arc<dyn TokenValidator>>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_preflight_request(request.method(), request.headers()) {
        return next.run(request).await;
    }

    let Some(token) = bearer_token(request.headers()) else {
        return AuthError::Unauthenticated.into_response();
    };

    let claims = match validator.validate_and_parse(token).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "bearer token rejected");
            return err.into_response();
        }
    };

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Route layer enforcing a [`Policy`]; must run after [`authenticate`].
pub async fn enforce_policy(State(policy): State<Policy>, request: Request, next: Next) -> Response {
    let Some(claims) = request.extensions().get::<Claims>() else {
        return AuthError::Unauthenticated.into_response();
    };

    if let Err(err) = policy.check(claims) {
        return err.into_response();
    }

    next.run(request).await
}

/// Extract Bearer token from Authorization header
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Check if this is a CORS preflight request
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(axum::http::header::ORIGIN)
        && headers.contains_key(axum::http::header::ACCESS_CONTROL_REQUEST_METHOD)
}
