use std::sync::Arc;

use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use axum::response::Response;
use uuid::Uuid;

use crate::api::rest::dto::{QuestionDto, QuestionReq};
use crate::api::rest::extract::CurrentUser;
use crate::api::rest::handlers::{ApiResult, created_json};
use crate::module::ConcreteAppServices;

#[tracing::instrument(name = "surveys.list_questions", skip(svc, caller), fields(survey.id = %survey_id))]
pub async fn list_questions(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Path(survey_id): Path<Uuid>,
) -> ApiResult<Json<Vec<QuestionDto>>> {
    let questions = svc.questions.list_questions(&caller, survey_id).await?;
    Ok(Json(questions.into_iter().map(QuestionDto::from).collect()))
}

#[tracing::instrument(name = "surveys.add_question", skip(svc, caller, req_body), fields(survey.id = %survey_id))]
pub async fn add_question(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Path(survey_id): Path<Uuid>,
    Json(req_body): Json<QuestionReq>,
) -> ApiResult<Response> {
    let question = svc
        .questions
        .add_question(&caller, survey_id, req_body.into())
        .await?;
    let location = format!("/questions/{}", question.id);
    Ok(created_json(&location, QuestionDto::from(question)))
}

#[tracing::instrument(name = "surveys.get_question", skip(svc, caller), fields(question.id = %id))]
pub async fn get_question(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<QuestionDto>> {
    let question = svc.questions.get_question(&caller, id).await?;
    Ok(Json(question.into()))
}

#[tracing::instrument(name = "surveys.update_question", skip(svc, caller, req_body), fields(question.id = %id))]
pub async fn update_question(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req_body): Json<QuestionReq>,
) -> ApiResult<Json<QuestionDto>> {
    let question = svc
        .questions
        .update_question(&caller, id, req_body.into())
        .await?;
    Ok(Json(question.into()))
}

#[tracing::instrument(name = "surveys.delete_question", skip(svc, caller), fields(question.id = %id))]
pub async fn delete_question(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    svc.questions.delete_question(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
