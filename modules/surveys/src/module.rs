use std::sync::Arc;

use axum::{Router, middleware};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use survey_auth::TokenValidator;
use survey_auth::axum_ext::authenticate;
use tracing::info;

use crate::api::rest::routes;
use crate::config::SurveysConfig;
use crate::domain::service::AppServices;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{
    OrmContributorRequestsRepository, OrmQuestionsRepository, OrmSurveysRepository,
    OrmTenantsRepository, OrmUsersRepository,
};

/// Services wired to the sea-orm repositories.
pub type ConcreteAppServices = AppServices<
    OrmTenantsRepository,
    OrmUsersRepository,
    OrmSurveysRepository,
    OrmQuestionsRepository,
    OrmContributorRequestsRepository,
>;

/// The surveys REST API: services plus the token validator guarding them.
pub struct SurveysModule {
    services: Arc<ConcreteAppServices>,
    validator: Arc<dyn TokenValidator>,
}

impl SurveysModule {
    pub fn new(
        db: DatabaseConnection,
        config: SurveysConfig,
        validator: Arc<dyn TokenValidator>,
    ) -> Self {
        info!("Initializing surveys module");

        let services = AppServices::new(
            db,
            OrmTenantsRepository,
            OrmUsersRepository,
            OrmSurveysRepository,
            OrmQuestionsRepository,
            OrmContributorRequestsRepository,
            config,
        );

        Self {
            services: Arc::new(services),
            validator,
        }
    }

    /// Apply pending schema migrations.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running surveys database migrations");
        Migrator::up(db, None).await?;
        info!("Surveys database migrations completed successfully");
        Ok(())
    }

    #[must_use]
    pub fn services(&self) -> Arc<ConcreteAppServices> {
        Arc::clone(&self.services)
    }

    /// Full API router: bearer-protected routes plus the public ones.
    pub fn router(&self) -> Router {
        info!("Registering surveys REST routes");

        let protected = routes::register_routes(Router::new(), self.services())
            .layer(middleware::from_fn_with_state(
                Arc::clone(&self.validator),
                authenticate,
            ));

        routes::public_routes().merge(protected)
    }
}
