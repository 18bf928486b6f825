use std::sync::Arc;

use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use axum::response::Response;
use uuid::Uuid;

use crate::api::rest::dto::{ContributorRequestDto, ContributorsDto, CreateContributorRequestReq};
use crate::api::rest::extract::CurrentUser;
use crate::api::rest::handlers::{ApiResult, created_json};
use crate::module::ConcreteAppServices;

#[tracing::instrument(name = "surveys.list_contributors", skip(svc, caller), fields(survey.id = %survey_id))]
pub async fn list_contributors(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Path(survey_id): Path<Uuid>,
) -> ApiResult<Json<ContributorsDto>> {
    let contributors = svc
        .contributors
        .list_contributors(&caller, survey_id)
        .await?;
    Ok(Json(contributors.into()))
}

#[tracing::instrument(name = "surveys.add_contributor_request", skip(svc, caller, req_body), fields(survey.id = %survey_id))]
pub async fn add_contributor_request(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Path(survey_id): Path<Uuid>,
    Json(req_body): Json<CreateContributorRequestReq>,
) -> ApiResult<Response> {
    let request = svc
        .contributors
        .add_request(&caller, survey_id, &req_body.email_address)
        .await?;
    let location = format!("/surveys/{survey_id}/contributors");
    Ok(created_json(&location, ContributorRequestDto::from(request)))
}

#[tracing::instrument(name = "surveys.process_pending_contributor_requests", skip(svc, caller))]
pub async fn process_pending_contributor_requests(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<StatusCode> {
    svc.contributors.process_pending(&caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
