use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{Json, Router, middleware};
use survey_auth::Policy;
use survey_auth::axum_ext::enforce_policy;

use crate::api::rest::dto::HealthDto;
use crate::api::rest::handlers::{contributors, questions, surveys, tenants, users};
use crate::api::rest::openapi;
use crate::module::ConcreteAppServices;

/// Register the authenticated API routes.
///
/// Callers must wrap the returned router in the bearer authentication layer.
pub fn register_routes(router: Router, service: Arc<ConcreteAppServices>) -> Router {
    let creator = middleware::from_fn_with_state(Policy::RequireSurveyCreator, enforce_policy);
    let admin = || middleware::from_fn_with_state(Policy::RequireSurveyAdmin, enforce_policy);

    router
        .route(
            "/surveys",
            post(surveys::create_survey).route_layer(creator),
        )
        .route("/surveys/published", get(surveys::list_published))
        .route(
            "/surveys/processpendingcontributorrequests",
            post(contributors::process_pending_contributor_requests),
        )
        .route(
            "/surveys/{id}",
            get(surveys::get_survey)
                .put(surveys::update_survey)
                .delete(surveys::delete_survey),
        )
        .route("/surveys/{id}/publish", put(surveys::publish))
        .route("/surveys/{id}/unpublish", put(surveys::unpublish))
        .route(
            "/surveys/{id}/contributors",
            get(contributors::list_contributors),
        )
        .route(
            "/surveys/{id}/contributorrequests",
            post(contributors::add_contributor_request),
        )
        .route(
            "/surveys/{id}/questions",
            get(questions::list_questions).post(questions::add_question),
        )
        .route(
            "/questions/{id}",
            get(questions::get_question)
                .put(questions::update_question)
                .delete(questions::delete_question),
        )
        .route("/users/me", get(users::current_user))
        .route("/users/{id}/surveys", get(surveys::list_for_user))
        .route(
            "/tenants/{id}/surveys",
            get(surveys::list_for_tenant).route_layer(admin()),
        )
        .route("/tenants", post(tenants::register_tenant).route_layer(admin()))
        .layer(axum::Extension(service))
}

/// Routes reachable without a token.
pub fn public_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/openapi.json", get(openapi_json))
}

async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_owned(),
    })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::build_openapi())
}
