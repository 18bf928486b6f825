use async_trait::async_trait;
use sea_orm::ConnectionTrait;

use crate::domain::error::DomainError;
use crate::domain::model::Tenant;

#[async_trait]
pub trait TenantsRepository: Send + Sync {
    /// Find the tenant registered for a token issuer.
    async fn find_by_issuer<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        issuer: &str,
    ) -> Result<Option<Tenant>, DomainError>;

    /// Register a new tenant.
    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant: Tenant,
    ) -> Result<Tenant, DomainError>;
}
