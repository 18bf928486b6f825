use std::sync::Arc;

use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use axum::response::Response;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::dto::{
    CreateSurveyReq, SurveyDto, SurveySummaryDto, TenantSurveysDto, UpdateSurveyReq,
    UserSurveysDto,
};
use crate::api::rest::extract::CurrentUser;
use crate::api::rest::handlers::{ApiResult, created_json};
use crate::module::ConcreteAppServices;

#[tracing::instrument(name = "surveys.get_survey", skip(svc, caller), fields(survey.id = %id))]
pub async fn get_survey(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SurveyDto>> {
    let details = svc.surveys.get_survey(&caller, id).await?;
    Ok(Json(details.into()))
}

#[tracing::instrument(name = "surveys.list_for_user", skip(svc, caller), fields(user.id = %user_id))]
pub async fn list_for_user(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserSurveysDto>> {
    let surveys = svc.surveys.list_for_user(&caller, user_id).await?;
    Ok(Json(surveys.into()))
}

#[tracing::instrument(name = "surveys.list_for_tenant", skip(svc, caller), fields(tenant.id = %tenant_id))]
pub async fn list_for_tenant(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<TenantSurveysDto>> {
    let surveys = svc.surveys.list_for_tenant(&caller, tenant_id).await?;
    Ok(Json(surveys.into()))
}

#[tracing::instrument(name = "surveys.list_published", skip(svc, caller))]
pub async fn list_published(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<Json<Vec<SurveySummaryDto>>> {
    let surveys = svc.surveys.list_published(&caller).await?;
    Ok(Json(surveys.into_iter().map(SurveySummaryDto::from).collect()))
}

#[tracing::instrument(name = "surveys.create_survey", skip(svc, caller, req_body))]
pub async fn create_survey(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Json(req_body): Json<CreateSurveyReq>,
) -> ApiResult<Response> {
    info!("Creating survey");
    let survey = svc.surveys.create_survey(&caller, req_body.into()).await?;
    let location = format!("/surveys/{}", survey.id);
    Ok(created_json(&location, SurveyDto::from(survey)))
}

#[tracing::instrument(name = "surveys.update_survey", skip(svc, caller, req_body), fields(survey.id = %id))]
pub async fn update_survey(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req_body): Json<UpdateSurveyReq>,
) -> ApiResult<Json<SurveyDto>> {
    let survey = svc
        .surveys
        .update_survey(&caller, id, req_body.into())
        .await?;
    Ok(Json(survey.into()))
}

#[tracing::instrument(name = "surveys.delete_survey", skip(svc, caller), fields(survey.id = %id))]
pub async fn delete_survey(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    svc.surveys.delete_survey(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "surveys.publish", skip(svc, caller), fields(survey.id = %id))]
pub async fn publish(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SurveyDto>> {
    let survey = svc.surveys.publish(&caller, id).await?;
    Ok(Json(survey.into()))
}

#[tracing::instrument(name = "surveys.unpublish", skip(svc, caller), fields(survey.id = %id))]
pub async fn unpublish(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SurveyDto>> {
    let survey = svc.surveys.unpublish(&caller, id).await?;
    Ok(Json(survey.into()))
}
