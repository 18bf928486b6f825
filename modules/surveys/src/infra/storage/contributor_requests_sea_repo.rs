use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::ContributorRequest;
use crate::domain::repos::ContributorRequestsRepository;
use crate::infra::storage::db::{db_err, is_unique_violation};
use crate::infra::storage::entity::contributor_request::{
    ActiveModel as RequestAM, Column, Entity as RequestEntity,
};

/// ORM-based implementation of the `ContributorRequestsRepository` trait.
#[derive(Clone, Default)]
pub struct OrmContributorRequestsRepository;

#[async_trait]
impl ContributorRequestsRepository for OrmContributorRequestsRepository {
    async fn list_for_survey<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey_id: Uuid,
    ) -> Result<Vec<ContributorRequest>, DomainError> {
        let rows = RequestEntity::find()
            .filter(Column::SurveyId.eq(survey_id))
            .order_by_asc(Column::CreatedAt)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_for_email<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Vec<ContributorRequest>, DomainError> {
        let rows = RequestEntity::find()
            .filter(Column::EmailAddress.eq(email))
            .order_by_asc(Column::CreatedAt)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey_id: Uuid,
        email: &str,
    ) -> Result<Option<ContributorRequest>, DomainError> {
        let found = RequestEntity::find()
            .filter(
                sea_orm::Condition::all()
                    .add(Column::SurveyId.eq(survey_id))
                    .add(Column::EmailAddress.eq(email)),
            )
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        request: ContributorRequest,
    ) -> Result<ContributorRequest, DomainError> {
        let m = RequestAM {
            id: Set(request.id),
            survey_id: Set(request.survey_id),
            email_address: Set(request.email_address.clone()),
            created_at: Set(request.created_at),
        };

        m.insert(conn).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::contributor_request_exists(request.email_address.clone())
            } else {
                db_err(e)
            }
        })?;
        Ok(request)
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = RequestEntity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_for_survey<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey_id: Uuid,
    ) -> Result<u64, DomainError> {
        let result = RequestEntity::delete_many()
            .filter(Column::SurveyId.eq(survey_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}
