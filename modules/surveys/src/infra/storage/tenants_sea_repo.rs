use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::domain::error::DomainError;
use crate::domain::model::Tenant;
use crate::domain::repos::TenantsRepository;
use crate::infra::storage::db::{db_err, is_unique_violation};
use crate::infra::storage::entity::tenant::{
    ActiveModel as TenantAM, Column, Entity as TenantEntity,
};

/// ORM-based implementation of the `TenantsRepository` trait.
#[derive(Clone, Default)]
pub struct OrmTenantsRepository;

#[async_trait]
impl TenantsRepository for OrmTenantsRepository {
    async fn find_by_issuer<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        issuer: &str,
    ) -> Result<Option<Tenant>, DomainError> {
        let found = TenantEntity::find()
            .filter(sea_orm::Condition::all().add(Expr::col(Column::IssuerValue).eq(issuer)))
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant: Tenant,
    ) -> Result<Tenant, DomainError> {
        let m = TenantAM {
            id: Set(tenant.id),
            issuer_value: Set(tenant.issuer_value.clone()),
            created_at: Set(tenant.created_at),
        };

        m.insert(conn).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::tenant_already_registered(tenant.issuer_value.clone())
            } else {
                db_err(e)
            }
        })?;
        Ok(tenant)
    }
}
