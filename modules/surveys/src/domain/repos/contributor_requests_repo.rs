use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::ContributorRequest;

/// Pending contributor invitations.
///
/// Email addresses are stored and matched in normalized (lower-case) form.
#[async_trait]
pub trait ContributorRequestsRepository: Send + Sync {
    async fn list_for_survey<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey_id: Uuid,
    ) -> Result<Vec<ContributorRequest>, DomainError>;

    /// Pending requests addressed to an email across all surveys.
    async fn list_for_email<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Vec<ContributorRequest>, DomainError>;

    async fn find<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey_id: Uuid,
        email: &str,
    ) -> Result<Option<ContributorRequest>, DomainError>;

    /// Insert a request. A duplicate (survey, email) pair fails with
    /// `DomainError::ContributorRequestExists`.
    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        request: ContributorRequest,
    ) -> Result<ContributorRequest, DomainError>;

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError>;

    async fn delete_for_survey<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey_id: Uuid,
    ) -> Result<u64, DomainError>;
}
