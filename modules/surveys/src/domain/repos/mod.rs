//! Persistence ports.
//!
//! Every method takes the connection explicitly so services can run several
//! repository calls inside one transaction.

mod contributor_requests_repo;
mod questions_repo;
mod surveys_repo;
mod tenants_repo;
mod users_repo;

pub use contributor_requests_repo::ContributorRequestsRepository;
pub use questions_repo::QuestionsRepository;
pub use surveys_repo::SurveysRepository;
pub use tenants_repo::TenantsRepository;
pub use users_repo::UsersRepository;
