use std::sync::Arc;

use sea_orm::DatabaseConnection;
use survey_auth::Claims;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Caller, Tenant, User};
use crate::domain::repos::{TenantsRepository, UsersRepository};
use crate::domain::service::validation::normalize_email;

/// Maps validated token claims onto registered tenants and provisioned users.
pub struct IdentityService<TR, UR> {
    tenants: Arc<TR>,
    users: Arc<UR>,
    db: DatabaseConnection,
}

impl<TR, UR> IdentityService<TR, UR>
where
    TR: TenantsRepository,
    UR: UsersRepository,
{
    pub fn new(tenants: Arc<TR>, users: Arc<UR>, db: DatabaseConnection) -> Self {
        Self { tenants, users, db }
    }

    /// Resolve the caller of a request.
    ///
    /// The token issuer must belong to a registered tenant. The user is
    /// created on first sight and their profile refreshed from the claims.
    pub async fn resolve(&self, claims: &Claims) -> Result<Caller, DomainError> {
        let tenant = self
            .tenants
            .find_by_issuer(&self.db, &claims.issuer)
            .await?
            .ok_or_else(|| DomainError::tenant_not_registered(claims.issuer.clone()))?;

        let user = self.provision_user(&tenant, claims).await?;

        Ok(Caller {
            tenant_id: tenant.id,
            user_id: user.id,
            email: normalize_email(&user.email),
            display_name: user.display_name,
            roles: claims.roles.clone(),
        })
    }

    async fn provision_user(&self, tenant: &Tenant, claims: &Claims) -> Result<User, DomainError> {
        let email = claims.email.as_deref().unwrap_or_default().trim().to_owned();
        let display_name = claims.display_name().to_owned();

        let existing = self
            .users
            .find_by_object_id(&self.db, tenant.id, &claims.object_id)
            .await?;

        match existing {
            Some(user) if user.email == email && user.display_name == display_name => Ok(user),
            Some(mut user) => {
                tracing::info!(user_id = %user.id, "Refreshing user profile from claims");
                user.email = email;
                user.display_name = display_name;
                user.updated_at = OffsetDateTime::now_utc();
                self.users.update(&self.db, user).await
            }
            None => {
                let now = OffsetDateTime::now_utc();
                let user = User {
                    id: Uuid::now_v7(),
                    tenant_id: tenant.id,
                    object_id: claims.object_id.clone(),
                    email,
                    display_name,
                    created_at: now,
                    updated_at: now,
                };
                tracing::info!(user_id = %user.id, tenant_id = %tenant.id, "Provisioning new user");

                match self.users.create(&self.db, user).await {
                    Ok(user) => Ok(user),
                    // A concurrent first request may have created the user already.
                    Err(err) => self
                        .users
                        .find_by_object_id(&self.db, tenant.id, &claims.object_id)
                        .await?
                        .ok_or(err),
                }
            }
        }
    }

    /// Register the caller's token issuer as a new tenant.
    pub async fn register_tenant(&self, claims: &Claims) -> Result<Tenant, DomainError> {
        tracing::info!(issuer = %claims.issuer, "Registering tenant");

        if self
            .tenants
            .find_by_issuer(&self.db, &claims.issuer)
            .await?
            .is_some()
        {
            return Err(DomainError::tenant_already_registered(claims.issuer.clone()));
        }

        let tenant = Tenant {
            id: Uuid::now_v7(),
            issuer_value: claims.issuer.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.tenants.create(&self.db, tenant).await
    }

    /// Profile of the resolved caller.
    pub async fn current_user(&self, caller: &Caller) -> Result<User, DomainError> {
        self.users
            .get(&self.db, caller.user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(caller.user_id))
    }
}
