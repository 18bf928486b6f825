//! Infrastructure storage layer - SeaORM entities, mappers, migrations and
//! repository implementations.
//!
//! All SeaORM-specific code lives here; the domain layer only sees the
//! repository traits in `domain::repos`.

pub mod db;
pub mod entity;
pub mod mapper;
pub mod migrations;

mod contributor_requests_sea_repo;
mod questions_sea_repo;
mod surveys_sea_repo;
mod tenants_sea_repo;
mod users_sea_repo;

pub use contributor_requests_sea_repo::OrmContributorRequestsRepository;
pub use questions_sea_repo::OrmQuestionsRepository;
pub use surveys_sea_repo::OrmSurveysRepository;
pub use tenants_sea_repo::OrmTenantsRepository;
pub use users_sea_repo::OrmUsersRepository;
