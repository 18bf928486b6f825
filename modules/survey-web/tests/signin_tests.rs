#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use axum::http::{StatusCode, header};
use httpmock::prelude::*;
use support::{TestApp, app, app_with_idp, get, location};
use survey_web::clients::models::UserProfile;
use time::OffsetDateTime;
use tower::ServiceExt;
use url::Url;
use uuid::Uuid;

async fn begin(app: &TestApp, path: &str) -> Url {
    let response = app.router.clone().oneshot(get(path, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    Url::parse(location(&response)).unwrap()
}

fn state_of(url: &Url) -> String {
    url.query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap()
}

fn token_endpoint(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/token")
            .body_includes("grant_type=authorization_code")
            .body_includes("code=auth-code")
            .body_includes("client_secret=web-secret");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"access_token":"idp-token","expires_in":3600,"token_type":"Bearer"}"#);
    })
}

fn with_profile(app: &TestApp) -> Uuid {
    let id = Uuid::now_v7();
    *app.api.profile.lock().unwrap() = Some(UserProfile {
        id,
        tenant_id: Uuid::now_v7(),
        email: "alice@example.com".to_owned(),
        display_name: "Alice".to_owned(),
    });
    id
}

#[tokio::test]
async fn signin_redirects_to_authorize_endpoint() {
    let app = app();
    let url = begin(&app, "/account/signin").await;

    assert_eq!(url.path(), "/authorize");
    assert!(url
        .query_pairs()
        .any(|(k, v)| k == "client_id" && v == "web-client"));
    assert!(!url.query_pairs().any(|(k, _)| k == "prompt"));
    assert_eq!(state_of(&url).len(), 43);
}

#[tokio::test]
async fn signup_asks_for_admin_consent() {
    let app = app();
    let url = begin(&app, "/account/signup").await;
    assert!(url
        .query_pairs()
        .any(|(k, v)| k == "prompt" && v == "admin_consent"));
}

#[tokio::test]
async fn callback_creates_session() {
    let server = MockServer::start();
    let token = token_endpoint(&server);
    let app = app_with_idp(&server.base_url());
    let user_id = with_profile(&app);

    let state = state_of(&begin(&app, "/account/signin").await);
    let response = app
        .router
        .clone()
        .oneshot(get(
            &format!("/signin-oidc?code=auth-code&state={state}"),
            None,
        ))
        .await
        .unwrap();

    token.assert();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/surveys");
    assert_eq!(app.api.calls(), vec!["current_user"]);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    let session_id = cookie
        .strip_prefix("surveys_session=")
        .and_then(|rest| rest.split(';').next())
        .unwrap();
    let session = app.sessions.get(session_id).unwrap();
    assert_eq!(session.user_id, user_id);
    assert!(session.is_creator());

    // Token lifetime (1h) is shorter than the configured session TTL.
    assert!(cookie.contains("Max-Age=3600"));
    assert!(session.expires_at <= OffsetDateTime::now_utc() + time::Duration::seconds(3600));
}

#[tokio::test]
async fn session_without_token_expiry_uses_configured_ttl() {
    let server = MockServer::start();
    let token = server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"access_token":"idp-token","token_type":"Bearer"}"#);
    });
    let app = app_with_idp(&server.base_url());
    with_profile(&app);

    let state = state_of(&begin(&app, "/account/signin").await);
    let response = app
        .router
        .clone()
        .oneshot(get(
            &format!("/signin-oidc?code=auth-code&state={state}"),
            None,
        ))
        .await
        .unwrap();

    token.assert();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.contains(&format!("Max-Age={}", 8 * 60 * 60)));
}

#[tokio::test]
async fn state_is_single_use() {
    let server = MockServer::start();
    let _token = token_endpoint(&server);
    let app = app_with_idp(&server.base_url());
    with_profile(&app);

    let state = state_of(&begin(&app, "/account/signin").await);
    let uri = format!("/signin-oidc?code=auth-code&state={state}");

    let first = app.router.clone().oneshot(get(&uri, None)).await.unwrap();
    assert_eq!(first.status(), StatusCode::SEE_OTHER);

    let replay = app.router.clone().oneshot(get(&uri, None)).await.unwrap();
    assert_eq!(replay.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signup_registers_tenant_before_loading_profile() {
    let server = MockServer::start();
    let _token = token_endpoint(&server);
    let app = app_with_idp(&server.base_url());
    with_profile(&app);

    let state = state_of(&begin(&app, "/account/signup").await);
    let response = app
        .router
        .clone()
        .oneshot(get(
            &format!("/signin-oidc?code=auth-code&state={state}"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.api.calls(), vec!["register_tenant", "current_user"]);
}

#[tokio::test]
async fn signup_of_registered_tenant_still_signs_in() {
    let server = MockServer::start();
    let _token = token_endpoint(&server);
    let app = app_with_idp(&server.base_url());
    with_profile(&app);
    app.api.fail("register_tenant", StatusCode::CONFLICT);

    let state = state_of(&begin(&app, "/account/signup").await);
    let response = app
        .router
        .clone()
        .oneshot(get(
            &format!("/signin-oidc?code=auth-code&state={state}"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/surveys");
}

#[tokio::test]
async fn unregistered_tenant_is_denied() {
    let server = MockServer::start();
    let _token = token_endpoint(&server);
    let app = app_with_idp(&server.base_url());
    app.api.fail("current_user", StatusCode::FORBIDDEN);

    let state = state_of(&begin(&app, "/account/signin").await);
    let response = app
        .router
        .clone()
        .oneshot(get(
            &format!("/signin-oidc?code=auth-code&state={state}"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn token_endpoint_failure_is_reported() {
    let server = MockServer::start();
    let token = server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(400).body(r#"{"error":"invalid_grant"}"#);
    });
    let app = app_with_idp(&server.base_url());

    let state = state_of(&begin(&app, "/account/signin").await);
    let response = app
        .router
        .clone()
        .oneshot(get(
            &format!("/signin-oidc?code=auth-code&state={state}"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(app.api.calls().is_empty());
}

#[tokio::test]
async fn provider_error_is_rejected() {
    let app = app();
    let response = app
        .router
        .oneshot(get(
            "/signin-oidc?error=access_denied&error_description=user+cancelled",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signout_drops_session_and_redirects_to_provider() {
    let app = app();
    let session = app.sign_in(&[]);

    let response = app
        .router
        .clone()
        .oneshot(get("/account/signout", Some(&session)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = Url::parse(location(&response)).unwrap();
    assert_eq!(target.path(), "/logout");
    assert!(target
        .query_pairs()
        .any(|(k, v)| k == "post_logout_redirect_uri" && v == "https://surveys.example.com/"));
    assert!(app.sessions.get(&session).is_none());
}
