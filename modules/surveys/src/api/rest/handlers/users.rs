use std::sync::Arc;

use axum::extract::{Extension, Json};

use crate::api::rest::dto::UserDto;
use crate::api::rest::extract::CurrentUser;
use crate::api::rest::handlers::ApiResult;
use crate::module::ConcreteAppServices;

#[tracing::instrument(name = "surveys.current_user", skip(svc, caller))]
pub async fn current_user(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<Json<UserDto>> {
    let user = svc.identity.current_user(&caller).await?;
    Ok(Json(user.into()))
}
