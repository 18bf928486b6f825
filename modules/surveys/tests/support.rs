#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use survey_auth::{AuthError, Claims, SURVEY_ADMIN, SURVEY_CREATOR, TokenValidator};
use surveys::domain::model::Caller;
use surveys::infra::storage::migrations::Migrator;
use surveys::{ConcreteAppServices, SurveysConfig, SurveysModule};

pub const ISSUER_A: &str = "https://idp.example.com/tenant-a/v2.0";
pub const ISSUER_B: &str = "https://idp.example.com/tenant-b/v2.0";

pub async fn inmem_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn claims(issuer: &str, object_id: &str, email: &str, roles: &[&str]) -> Claims {
    Claims {
        issuer: issuer.to_owned(),
        subject: object_id.to_owned(),
        audiences: vec!["api://surveys".to_owned()],
        expires_at: None,
        not_before: None,
        tenant_id: issuer.to_owned(),
        object_id: object_id.to_owned(),
        email: Some(email.to_owned()),
        name: Some(object_id.to_owned()),
        roles: roles.iter().map(|r| (*r).to_owned()).collect(),
        extras: serde_json::Map::new(),
    }
}

pub fn admin(issuer: &str, object_id: &str, email: &str) -> Claims {
    claims(issuer, object_id, email, &[SURVEY_ADMIN])
}

pub fn creator(issuer: &str, object_id: &str, email: &str) -> Claims {
    claims(issuer, object_id, email, &[SURVEY_CREATOR])
}

pub fn member(issuer: &str, object_id: &str, email: &str) -> Claims {
    claims(issuer, object_id, email, &[])
}

pub fn module(db: DatabaseConnection) -> SurveysModule {
    SurveysModule::new(db, SurveysConfig::default(), Arc::new(StubValidator))
}

pub async fn services() -> Arc<ConcreteAppServices> {
    module(inmem_db().await).services()
}

/// Register a tenant for `issuer` and return its administrator.
pub async fn tenant_admin(svc: &ConcreteAppServices, issuer: &str) -> Caller {
    let claims = admin(issuer, "admin", "admin@example.com");
    svc.identity.register_tenant(&claims).await.unwrap();
    svc.identity.resolve(&claims).await.unwrap()
}

pub async fn resolve(svc: &ConcreteAppServices, claims: &Claims) -> Caller {
    svc.identity.resolve(claims).await.unwrap()
}

/// Accepts tokens of the form `<issuer>|<object_id>|<email>|<role,...>`.
pub struct StubValidator;

#[async_trait]
impl TokenValidator for StubValidator {
    async fn validate_and_parse(&self, token: &str) -> Result<Claims, AuthError> {
        let parts: Vec<&str> = token.split('|').collect();
        let [issuer, object_id, email, roles] = parts.as_slice() else {
            return Err(AuthError::InvalidToken("malformed stub token".to_owned()));
        };
        let roles: Vec<&str> = roles.split(',').filter(|r| !r.is_empty()).collect();
        Ok(claims(issuer, object_id, email, &roles))
    }
}

pub fn token(issuer: &str, object_id: &str, email: &str, roles: &[&str]) -> String {
    format!("{issuer}|{object_id}|{email}|{}", roles.join(","))
}
