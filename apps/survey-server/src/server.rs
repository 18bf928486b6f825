//! Database bootstrap and the two HTTP listeners.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    Router,
    body::Body,
    http::{HeaderName, Request, StatusCode},
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use survey_auth::{JwtValidator, TokenValidator};
use survey_web::WebApp;
use surveys::SurveysModule;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::{AppConfig, DatabaseConfig, MOCK_DSN};
use crate::signals::wait_for_shutdown;

const REQUEST_ID_HEADER: &str = "x-request-id";
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.dsn.clone());
    options
        .max_connections(config.max_conns)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .sqlx_logging(false);

    // Every connection to `sqlite::memory:` opens its own empty database.
    if config.dsn == MOCK_DSN {
        options.max_connections(1).min_connections(1);
    }

    let shown = crate::config::redact_dsn_password(&config.dsn)?;
    info!(dsn = %shown, "Connecting to database");
    Database::connect(options)
        .await
        .context("failed to connect to database")
}

/// Apply migrations and exit.
pub async fn migrate(config: &AppConfig) -> Result<()> {
    let db = connect(&config.database).await?;
    SurveysModule::migrate(&db).await
}

/// Request ids, tracing spans and a request timeout, outermost first.
pub fn with_http_layers(router: Router, service: &'static str, timeout: Duration) -> Router {
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            timeout,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(move |req: &Request<Body>| {
                let request_id = req
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");
                tracing::info_span!(
                    "http_request",
                    service,
                    method = %req.method(),
                    uri = %req.uri().path(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
}

/// Run the API and the web front-end until a shutdown signal arrives.
pub async fn run(config: AppConfig) -> Result<()> {
    let db = connect(&config.database).await?;
    SurveysModule::migrate(&db).await?;

    let validator: Arc<dyn TokenValidator> = Arc::new(
        JwtValidator::from_config(&config.auth).context("invalid auth configuration")?,
    );

    let api = SurveysModule::new(db, config.surveys.clone(), Arc::clone(&validator));
    let web = WebApp::new(config.web.clone(), validator)?;
    let sweeper = web.spawn_session_sweeper(SESSION_SWEEP_INTERVAL);

    let timeout = Duration::from_secs(config.server.request_timeout_secs);
    let api_router = with_http_layers(api.router(), "surveys-api", timeout);
    let web_router = with_http_layers(web.router(), "surveys-web", timeout);

    let api_listener = TcpListener::bind(config.server.api_bind)
        .await
        .with_context(|| format!("failed to bind API listener on {}", config.server.api_bind))?;
    let web_listener = TcpListener::bind(config.server.web_bind)
        .await
        .with_context(|| format!("failed to bind web listener on {}", config.server.web_bind))?;
    info!(addr = %api_listener.local_addr()?, "Surveys API listening");
    info!(addr = %web_listener.local_addr()?, "Surveys web front-end listening");

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown().await {
            tracing::error!(error = %e, "signal handling failed, shutting down");
        }
        trigger.cancel();
    });

    let api_server = axum::serve(api_listener, api_router)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned());
    let web_server = axum::serve(web_listener, web_router)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned());

    let result = tokio::try_join!(api_server.into_future(), web_server.into_future());
    sweeper.abort();
    result.context("HTTP server failed")?;

    info!("Surveys server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use tower::ServiceExt;

    #[tokio::test]
    async fn request_id_is_generated_and_propagated() {
        let router = with_http_layers(
            Router::new().route("/ping", get(|| async { "pong" })),
            "test",
            Duration::from_secs(5),
        );

        let response = router
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn incoming_request_id_is_kept() {
        let router = with_http_layers(
            Router::new().route("/ping", get(|| async { "pong" })),
            "test",
            Duration::from_secs(5),
        );

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn mock_database_is_migrated() {
        let config = DatabaseConfig {
            dsn: MOCK_DSN.to_owned(),
            ..DatabaseConfig::default()
        };
        let db = connect(&config).await.unwrap();
        SurveysModule::migrate(&db).await.unwrap();
    }
}
