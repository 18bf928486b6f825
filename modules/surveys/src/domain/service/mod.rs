//! Domain service layer - business logic and rules.
//!
//! Per-resource submodules:
//! - `identity` - resolves token claims to a tenant user, tenant sign-up
//! - `surveys` - survey CRUD, listings and publishing
//! - `questions` - question CRUD within a survey
//! - `contributors` - contributor invitations and their acceptance
//!
//! Every operation on an existing survey goes through [`load_authorized`],
//! which loads the survey and checks the caller's permission for the
//! operation.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, TransactionTrait};
use uuid::Uuid;

use crate::config::SurveysConfig;
use crate::domain::authorization::{SurveyOperation, authorize};
use crate::domain::error::DomainError;
use crate::domain::model::{Caller, Survey};
use crate::domain::repos::{
    ContributorRequestsRepository, QuestionsRepository, SurveysRepository, TenantsRepository,
    UsersRepository,
};

mod contributors;
mod identity;
mod questions;
mod surveys;
pub(crate) mod validation;

pub use contributors::ContributorsService;
pub use identity::IdentityService;
pub use questions::QuestionsService;
pub use surveys::SurveysService;

/// Load a survey and check that the caller may perform `op` on it.
pub(crate) async fn load_authorized<SR, C>(
    surveys: &SR,
    conn: &C,
    caller: &Caller,
    survey_id: Uuid,
    op: SurveyOperation,
) -> Result<Survey, DomainError>
where
    SR: SurveysRepository,
    C: ConnectionTrait + Send + Sync,
{
    let survey = surveys
        .get(conn, survey_id)
        .await?
        .ok_or_else(|| DomainError::survey_not_found(survey_id))?;
    let contributor_ids = surveys.contributor_ids(conn, survey_id).await?;
    authorize(caller, &survey, &contributor_ids, op)?;
    Ok(survey)
}

pub(crate) async fn begin(db: &DatabaseConnection) -> Result<DatabaseTransaction, DomainError> {
    db.begin()
        .await
        .map_err(|e| DomainError::database(e.to_string()))
}

pub(crate) async fn commit(txn: DatabaseTransaction) -> Result<(), DomainError> {
    txn.commit()
        .await
        .map_err(|e| DomainError::database(e.to_string()))
}

// DI Container - aggregates all domain services
pub struct AppServices<TR, UR, SR, QR, CR>
where
    TR: TenantsRepository,
    UR: UsersRepository,
    SR: SurveysRepository,
    QR: QuestionsRepository,
    CR: ContributorRequestsRepository,
{
    pub identity: IdentityService<TR, UR>,
    pub surveys: SurveysService<SR, QR, CR>,
    pub questions: QuestionsService<QR, SR>,
    pub contributors: ContributorsService<CR, SR, UR>,
}

impl<TR, UR, SR, QR, CR> AppServices<TR, UR, SR, QR, CR>
where
    TR: TenantsRepository,
    UR: UsersRepository,
    SR: SurveysRepository,
    QR: QuestionsRepository,
    CR: ContributorRequestsRepository,
{
    pub fn new(
        db: DatabaseConnection,
        tenants_repo: TR,
        users_repo: UR,
        surveys_repo: SR,
        questions_repo: QR,
        requests_repo: CR,
        config: SurveysConfig,
    ) -> Self {
        let config = Arc::new(config);
        let tenants_repo = Arc::new(tenants_repo);
        let users_repo = Arc::new(users_repo);
        let surveys_repo = Arc::new(surveys_repo);
        let questions_repo = Arc::new(questions_repo);
        let requests_repo = Arc::new(requests_repo);

        Self {
            identity: IdentityService::new(tenants_repo, Arc::clone(&users_repo), db.clone()),
            surveys: SurveysService::new(
                Arc::clone(&surveys_repo),
                Arc::clone(&questions_repo),
                Arc::clone(&requests_repo),
                db.clone(),
                Arc::clone(&config),
            ),
            questions: QuestionsService::new(
                questions_repo,
                Arc::clone(&surveys_repo),
                db.clone(),
                config,
            ),
            contributors: ContributorsService::new(requests_repo, surveys_repo, users_repo, db),
        }
    }
}
