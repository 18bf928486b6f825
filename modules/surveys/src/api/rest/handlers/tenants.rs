use std::sync::Arc;

use axum::extract::Extension;
use axum::response::Response;
use survey_auth::axum_ext::AuthClaims;
use tracing::info;

use crate::api::rest::dto::TenantDto;
use crate::api::rest::handlers::{ApiResult, created_json};
use crate::module::ConcreteAppServices;

/// Tenant sign-up. Runs on bare claims since no tenant exists yet to
/// resolve the caller against.
#[tracing::instrument(name = "surveys.register_tenant", skip(svc, claims), fields(issuer = %claims.issuer))]
pub async fn register_tenant(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    AuthClaims(claims): AuthClaims,
) -> ApiResult<Response> {
    info!("Registering tenant for issuer");
    let tenant = svc.identity.register_tenant(&claims).await?;
    let location = format!("/tenants/{}", tenant.id);
    Ok(created_json(&location, TenantDto::from(tenant)))
}
