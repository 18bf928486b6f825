use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::Question;

#[async_trait]
pub trait QuestionsRepository: Send + Sync {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Question>, DomainError>;

    /// Questions of a survey in creation order.
    async fn list_for_survey<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey_id: Uuid,
    ) -> Result<Vec<Question>, DomainError>;

    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        question: Question,
    ) -> Result<Question, DomainError>;

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        question: Question,
    ) -> Result<Question, DomainError>;

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
