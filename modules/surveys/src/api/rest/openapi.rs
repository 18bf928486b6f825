//! OpenAPI document for the surveys API.
//!
//! Schemas come from the DTO `ToSchema` derives; operations are listed in
//! [`OPERATIONS`] and assembled with the utoipa builders.

use utoipa::OpenApi;
use utoipa::openapi::content::ContentBuilder;
use utoipa::openapi::path::{
    HttpMethod, OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder, PathsBuilder,
};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::response::{ResponseBuilder, ResponsesBuilder};
use utoipa::openapi::schema::{ObjectBuilder, Schema, SchemaFormat, SchemaType, Type};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme};
use utoipa::openapi::{Ref, RefOr, Required};

use crate::api::rest::dto::{
    ContributorRequestDto, ContributorsDto, CreateContributorRequestReq, CreateSurveyReq,
    HealthDto, QuestionDto, QuestionReq, QuestionTypeDto, SurveyDto, SurveySummaryDto, TenantDto,
    TenantSurveysDto, UpdateSurveyReq, UserDto, UserSurveysDto,
};
use crate::api::rest::problem::{APPLICATION_PROBLEM_JSON, Problem};

#[derive(OpenApi)]
#[openapi(
    info(title = "Surveys API", description = "Multi-tenant survey authoring"),
    components(schemas(
        Problem,
        HealthDto,
        SurveyDto,
        SurveySummaryDto,
        UserSurveysDto,
        TenantSurveysDto,
        QuestionDto,
        QuestionTypeDto,
        QuestionReq,
        CreateSurveyReq,
        UpdateSurveyReq,
        ContributorsDto,
        ContributorRequestDto,
        CreateContributorRequestReq,
        UserDto,
        TenantDto,
    ))
)]
struct ApiDoc;

struct RouteDoc {
    method: HttpMethod,
    path: &'static str,
    operation_id: &'static str,
    summary: &'static str,
    request: Option<&'static str>,
    status: u16,
    response: Option<&'static str>,
    response_is_array: bool,
}

const fn op(
    method: HttpMethod,
    path: &'static str,
    operation_id: &'static str,
    summary: &'static str,
    status: u16,
    response: Option<&'static str>,
) -> RouteDoc {
    RouteDoc {
        method,
        path,
        operation_id,
        summary,
        request: None,
        status,
        response,
        response_is_array: false,
    }
}

const fn with_body(mut route: RouteDoc, schema: &'static str) -> RouteDoc {
    route.request = Some(schema);
    route
}

const fn array(mut route: RouteDoc) -> RouteDoc {
    route.response_is_array = true;
    route
}

const OPERATIONS: &[RouteDoc] = &[
    op(HttpMethod::Get, "/surveys/{id}", "getSurvey", "Get a survey with its questions", 200, Some("SurveyDto")),
    op(HttpMethod::Get, "/users/{id}/surveys", "listUserSurveys", "Surveys of the calling user", 200, Some("UserSurveysDto")),
    op(HttpMethod::Get, "/tenants/{id}/surveys", "listTenantSurveys", "All surveys of a tenant", 200, Some("TenantSurveysDto")),
    array(op(HttpMethod::Get, "/surveys/published", "listPublishedSurveys", "Published surveys of the caller's tenant", 200, Some("SurveySummaryDto"))),
    with_body(op(HttpMethod::Post, "/surveys", "createSurvey", "Create a survey", 201, Some("SurveyDto")), "CreateSurveyReq"),
    with_body(op(HttpMethod::Put, "/surveys/{id}", "updateSurvey", "Update a survey", 200, Some("SurveyDto")), "UpdateSurveyReq"),
    op(HttpMethod::Delete, "/surveys/{id}", "deleteSurvey", "Delete a survey", 204, None),
    op(HttpMethod::Put, "/surveys/{id}/publish", "publishSurvey", "Publish a survey", 200, Some("SurveyDto")),
    op(HttpMethod::Put, "/surveys/{id}/unpublish", "unpublishSurvey", "Unpublish a survey", 200, Some("SurveyDto")),
    op(HttpMethod::Get, "/surveys/{id}/contributors", "listContributors", "Contributors and pending requests", 200, Some("ContributorsDto")),
    op(HttpMethod::Post, "/surveys/processpendingcontributorrequests", "processPendingContributorRequests", "Accept pending invitations of the caller", 204, None),
    with_body(op(HttpMethod::Post, "/surveys/{id}/contributorrequests", "addContributorRequest", "Invite a contributor", 201, Some("ContributorRequestDto")), "CreateContributorRequestReq"),
    array(op(HttpMethod::Get, "/surveys/{id}/questions", "listQuestions", "Questions of a survey", 200, Some("QuestionDto"))),
    with_body(op(HttpMethod::Post, "/surveys/{id}/questions", "addQuestion", "Add a question", 201, Some("QuestionDto")), "QuestionReq"),
    op(HttpMethod::Get, "/questions/{id}", "getQuestion", "Get a question", 200, Some("QuestionDto")),
    with_body(op(HttpMethod::Put, "/questions/{id}", "updateQuestion", "Replace a question", 200, Some("QuestionDto")), "QuestionReq"),
    op(HttpMethod::Delete, "/questions/{id}", "deleteQuestion", "Delete a question", 204, None),
    op(HttpMethod::Post, "/tenants", "registerTenant", "Register the caller's issuer as a tenant", 201, Some("TenantDto")),
    op(HttpMethod::Get, "/users/me", "currentUser", "Profile of the caller", 200, Some("UserDto")),
];

fn schema_ref(name: &str) -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(name))
}

fn uuid_schema() -> Schema {
    Schema::Object(
        ObjectBuilder::new()
            .schema_type(SchemaType::Type(Type::String))
            .format(Some(SchemaFormat::Custom("uuid".into())))
            .build(),
    )
}

fn build_operation(route: &RouteDoc) -> utoipa::openapi::path::Operation {
    let mut op = OperationBuilder::new()
        .operation_id(Some(route.operation_id))
        .summary(Some(route.summary))
        .tag("surveys")
        .security(SecurityRequirement::new("bearerAuth", Vec::<String>::new()));

    if route.path.contains("{id}") {
        op = op.parameter(
            ParameterBuilder::new()
                .name("id")
                .parameter_in(ParameterIn::Path)
                .required(Required::True)
                .schema(Some(uuid_schema())),
        );
    }

    if let Some(body) = route.request {
        let content = ContentBuilder::new().schema(Some(schema_ref(body))).build();
        op = op.request_body(Some(
            RequestBodyBuilder::new()
                .content("application/json", content)
                .required(Some(Required::True))
                .build(),
        ));
    }

    let success = match route.response {
        Some(name) => {
            let schema: RefOr<Schema> = if route.response_is_array {
                RefOr::T(Schema::Array(
                    utoipa::openapi::schema::ArrayBuilder::new()
                        .items(schema_ref(name))
                        .build(),
                ))
            } else {
                schema_ref(name)
            };
            ResponseBuilder::new()
                .description("Success")
                .content(
                    "application/json",
                    ContentBuilder::new().schema(Some(schema)).build(),
                )
                .build()
        }
        None => ResponseBuilder::new().description("No content").build(),
    };

    let problem = ResponseBuilder::new()
        .description("Error")
        .content(
            APPLICATION_PROBLEM_JSON,
            ContentBuilder::new()
                .schema(Some(schema_ref("Problem")))
                .build(),
        )
        .build();

    op.responses(
        ResponsesBuilder::new()
            .response(route.status.to_string(), success)
            .response("default", problem)
            .build(),
    )
    .build()
}

/// Assemble the OpenAPI document.
#[must_use]
pub fn build_openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();

    let mut paths = PathsBuilder::new();
    for route in OPERATIONS {
        let item = PathItemBuilder::new()
            .operation(route.method.clone(), build_operation(route))
            .build();
        paths = paths.path(route.path, item);
    }
    doc.paths = paths.build();

    if let Some(components) = doc.components.as_mut() {
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
    doc
}
