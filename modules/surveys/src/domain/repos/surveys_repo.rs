use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::Survey;

/// Repository trait for surveys and their contributor memberships.
#[async_trait]
pub trait SurveysRepository: Send + Sync {
    /// Find a survey by ID.
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Survey>, DomainError>;

    /// Surveys owned by a user.
    async fn list_by_owner<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        owner_id: Uuid,
    ) -> Result<Vec<Survey>, DomainError>;

    /// Surveys a user contributes to.
    async fn list_by_contributor<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<Vec<Survey>, DomainError>;

    /// Surveys of a tenant, optionally restricted to one published state.
    async fn list_by_tenant<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant_id: Uuid,
        published: Option<bool>,
    ) -> Result<Vec<Survey>, DomainError>;

    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey: Survey,
    ) -> Result<Survey, DomainError>;

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey: Survey,
    ) -> Result<Survey, DomainError>;

    /// Delete a survey by ID. Returns whether a row was removed.
    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError>;

    /// User ids of the survey's contributors.
    async fn contributor_ids<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError>;

    async fn add_contributor<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), DomainError>;

    /// Remove every contributor of a survey.
    async fn remove_contributors<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey_id: Uuid,
    ) -> Result<u64, DomainError>;
}
