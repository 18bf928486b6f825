#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use axum::http::{StatusCode, header};
use support::{app, app_with_limits, body_text, get, location, post_form};
use survey_web::FormLimits;
use survey_auth::SURVEY_CREATOR;
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn protected_pages_redirect_to_signin() {
    let app = app();
    let response = app.router.oneshot(get("/surveys", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/signin");
    assert!(app.api.calls().is_empty());
}

#[tokio::test]
async fn unknown_session_cookie_redirects_to_signin() {
    let app = app();
    let response = app
        .router
        .oneshot(get("/surveys", Some("not-a-session")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn home_greets_signed_in_user() {
    let app = app();
    let session = app.sign_in(&[]);
    let response = app.router.oneshot(get("/", Some(&session))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Welcome, Alice."));
}

#[tokio::test]
async fn survey_list_processes_pending_requests_first() {
    let app = app();
    let survey = app.api.add_survey(false);
    let session = app.sign_in(&[]);

    let response = app
        .router
        .oneshot(get("/surveys", Some(&session)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        app.api.calls(),
        vec!["process_pending_contributor_requests", "list_for_user"]
    );
    assert!(body_text(response).await.contains(&survey.title));
}

#[tokio::test]
async fn inviting_existing_contributor_makes_no_request() {
    let app = app();
    let survey = app.api.add_survey(false);
    app.api.add_contributor(survey.id, "Bob@Example.com");
    let session = app.sign_in(&[]);

    let response = app
        .router
        .oneshot(post_form(
            &format!("/surveys/{}/contributors/request", survey.id),
            &session,
            "email_address=bob%40example.com",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("already a contributor"));
    assert_eq!(app.api.calls(), vec!["get_contributors"]);
}

#[tokio::test]
async fn inviting_twice_makes_no_second_request() {
    let app = app();
    let survey = app.api.add_survey(false);
    app.api.add_pending_request(survey.id, "carol@example.com");
    let session = app.sign_in(&[]);

    let response = app
        .router
        .oneshot(post_form(
            &format!("/surveys/{}/contributors/request", survey.id),
            &session,
            "email_address=CAROL%40example.com",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!app.api.called("add_contributor_request"));
}

#[tokio::test]
async fn new_invitation_is_created() {
    let app = app();
    let survey = app.api.add_survey(false);
    let session = app.sign_in(&[]);

    let response = app
        .router
        .oneshot(post_form(
            &format!("/surveys/{}/contributors/request", survey.id),
            &session,
            "email_address=dave%40example.com",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("/surveys/{}/contributors", survey.id)
    );
    assert_eq!(
        app.api.calls(),
        vec!["get_contributors", "add_contributor_request"]
    );
}

#[tokio::test]
async fn invalid_invitation_email_is_rejected_locally() {
    let app = app();
    let survey = app.api.add_survey(false);
    let session = app.sign_in(&[]);

    let response = app
        .router
        .oneshot(post_form(
            &format!("/surveys/{}/contributors/request", survey.id),
            &session,
            "email_address=not-an-email",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.api.calls().is_empty());
}

#[tokio::test]
async fn publishing_published_survey_is_a_no_op() {
    let app = app();
    let survey = app.api.add_survey(true);
    let session = app.sign_in(&[]);

    let response = app
        .router
        .oneshot(post_form(
            &format!("/surveys/{}/publish", survey.id),
            &session,
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("already published"));
    assert_eq!(app.api.calls(), vec!["get_survey"]);
}

#[tokio::test]
async fn unpublishing_draft_is_a_no_op() {
    let app = app();
    let survey = app.api.add_survey(false);
    let session = app.sign_in(&[]);

    let confirm = app
        .router
        .clone()
        .oneshot(get(&format!("/surveys/{}/unpublish", survey.id), Some(&session)))
        .await
        .unwrap();
    assert!(body_text(confirm).await.contains("not published"));

    let response = app
        .router
        .oneshot(post_form(
            &format!("/surveys/{}/unpublish", survey.id),
            &session,
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!app.api.called("unpublish"));
}

#[tokio::test]
async fn publishing_draft_calls_api() {
    let app = app();
    let survey = app.api.add_survey(false);
    let session = app.sign_in(&[]);

    let response = app
        .router
        .oneshot(post_form(
            &format!("/surveys/{}/publish", survey.id),
            &session,
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.api.calls(), vec!["get_survey", "publish"]);
    assert!(app.api.survey(survey.id).unwrap().published);
}

#[tokio::test]
async fn forbidden_and_not_found_render_distinct_pages() {
    let app = app();
    let session = app.sign_in(&[]);
    let survey = app.api.add_survey(false);

    let missing = app
        .router
        .clone()
        .oneshot(get(&format!("/surveys/{}", Uuid::now_v7()), Some(&session)))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let missing_body = body_text(missing).await;
    assert!(missing_body.contains("Not found"));

    app.api.fail("get_survey", StatusCode::FORBIDDEN);
    let denied = app
        .router
        .oneshot(get(&format!("/surveys/{}", survey.id), Some(&session)))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    let denied_body = body_text(denied).await;
    assert!(denied_body.contains("Access denied"));
    assert!(!denied_body.contains("Not found"));
}

#[tokio::test]
async fn unexpected_failure_renders_error_page() {
    let app = app();
    let session = app.sign_in(&[]);
    app.api.fail("list_published", StatusCode::BAD_GATEWAY);

    let response = app
        .router
        .oneshot(get("/surveys/published", Some(&session)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert!(body.contains("An error occurred"));
    assert!(!body.contains("502"));
}

#[tokio::test]
async fn denied_edit_rerenders_form_with_flag() {
    let app = app();
    let survey = app.api.add_survey(false);
    let session = app.sign_in(&[]);
    app.api.fail("update_survey", StatusCode::FORBIDDEN);

    let response = app
        .router
        .oneshot(post_form(
            &format!("/surveys/{}/edit", survey.id),
            &session,
            "title=Renamed",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_text(response).await;
    assert!(body.contains("Forbidden:"));
    assert!(body.contains("value=\"Renamed\""));
}

#[tokio::test]
async fn rejected_token_ends_session() {
    let app = app();
    let session = app.sign_in(&[]);
    app.api.fail("list_published", StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .oneshot(get("/surveys/published", Some(&session)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/signin");
    let cookie = response.headers().get(header::SET_COOKIE).unwrap();
    assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
    assert!(app.sessions.get(&session).is_none());
}

#[tokio::test]
async fn create_redirects_to_details() {
    let app = app();
    let session = app.sign_in(&[SURVEY_CREATOR]);

    let response = app
        .router
        .oneshot(post_form("/surveys/new", &session, "title=+Lunch+poll+"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/surveys/"));
    assert_eq!(app.api.calls(), vec!["create_survey"]);
}

#[tokio::test]
async fn empty_title_is_rejected_without_api_call() {
    let app = app();
    let session = app.sign_in(&[SURVEY_CREATOR]);

    let response = app
        .router
        .oneshot(post_form("/surveys/new", &session, "title=+++"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("The title is required."));
    assert!(app.api.calls().is_empty());
}

#[tokio::test]
async fn tenant_page_requires_admin_role() {
    let app = app();
    let member = app.sign_in(&[]);
    let admin = app.sign_in_admin();

    let denied = app
        .router
        .clone()
        .oneshot(get("/surveys/tenant", Some(&member)))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    assert!(!app.api.called("list_for_tenant"));

    let allowed = app
        .router
        .oneshot(get("/surveys/tenant", Some(&admin)))
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
    assert!(app.api.called("list_for_tenant"));
}

#[tokio::test]
async fn multiple_choice_question_is_added() {
    let app = app();
    let survey = app.api.add_survey(false);
    let session = app.sign_in(&[]);

    let response = app
        .router
        .oneshot(post_form(
            &format!("/surveys/{}/questions/new", survey.id),
            &session,
            "text=Dessert%3F&question_type=MultipleChoice&possible_answers=Cake%0D%0AFruit",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/surveys/{}", survey.id));
    assert_eq!(app.api.calls(), vec!["add_question"]);
}

#[tokio::test]
async fn deleting_question_returns_to_survey() {
    let app = app();
    let survey = app.api.add_survey(false);
    let question = app.api.add_question(survey.id);
    let session = app.sign_in(&[]);

    let response = app
        .router
        .oneshot(post_form(
            &format!("/questions/{}/delete", question.id),
            &session,
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/surveys/{}", survey.id));
    assert_eq!(app.api.calls(), vec!["get_question", "delete_question"]);
}

#[tokio::test]
async fn unknown_route_renders_not_found() {
    let app = app();
    let response = app.router.oneshot(get("/nowhere", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invitation_with_two_at_signs_is_rejected_locally() {
    let app = app();
    let survey = app.api.add_survey(false);
    let session = app.sign_in(&[]);

    let response = app
        .router
        .oneshot(post_form(
            &format!("/surveys/{}/contributors/request", survey.id),
            &session,
            "email_address=bob%40a%40b",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Enter a valid email address."));
    assert!(app.api.calls().is_empty());
}

#[tokio::test]
async fn invitation_rejected_by_api_rerenders_form() {
    let app = app();
    let survey = app.api.add_survey(false);
    let session = app.sign_in(&[]);
    app.api
        .fail("add_contributor_request", StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .router
        .oneshot(post_form(
            &format!("/surveys/{}/contributors/request", survey.id),
            &session,
            "email_address=dave%40example.com",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("contributors/request"));
    assert!(body.contains("dave@example.com"));
    assert!(!body.contains("An error occurred"));
    assert_eq!(
        app.api.calls(),
        vec!["get_contributors", "add_contributor_request"]
    );
}

#[tokio::test]
async fn too_many_answers_are_rejected_without_api_call() {
    let app = app();
    let survey = app.api.add_survey(false);
    let session = app.sign_in(&[]);
    let answers = (1..=21)
        .map(|n| format!("Answer+{n}"))
        .collect::<Vec<_>>()
        .join("%0A");

    let response = app
        .router
        .oneshot(post_form(
            &format!("/surveys/{}/questions/new", survey.id),
            &session,
            &format!("text=Pick+one&question_type=MultipleChoice&possible_answers={answers}"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("at most 20 possible answers"));
    assert!(body.contains("Answer 21"));
    assert!(app.api.calls().is_empty());
}

#[tokio::test]
async fn question_rejected_by_api_keeps_form_input() {
    let app = app();
    let survey = app.api.add_survey(false);
    let session = app.sign_in(&[]);
    app.api.fail("add_question", StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .router
        .oneshot(post_form(
            &format!("/surveys/{}/questions/new", survey.id),
            &session,
            "text=Dessert&question_type=MultipleChoice&possible_answers=Cake%0AFruit",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("Dessert"));
    assert!(body.contains("Fruit"));
    assert!(!body.contains("An error occurred"));
    assert_eq!(app.api.calls(), vec!["add_question"]);
}

#[tokio::test]
async fn configured_title_limit_applies_to_forms() {
    let app = app_with_limits(FormLimits {
        max_title_length: 5,
        ..FormLimits::default()
    });
    let session = app.sign_in(&[SURVEY_CREATOR]);

    let response = app
        .router
        .oneshot(post_form("/surveys/new", &session, "title=Breakfast"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("The title is too long."));
    assert!(app.api.calls().is_empty());
}

#[tokio::test]
async fn title_rejected_by_api_rerenders_form() {
    let app = app();
    let session = app.sign_in(&[SURVEY_CREATOR]);
    app.api.fail("create_survey", StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .router
        .oneshot(post_form("/surveys/new", &session, "title=Lunch"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("invalid input"));
    assert!(body.contains("Lunch"));
}
