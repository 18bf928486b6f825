use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::Survey;
use crate::domain::repos::SurveysRepository;
use crate::infra::storage::db::{db_err, is_unique_violation};
use crate::infra::storage::entity::survey::{
    ActiveModel as SurveyAM, Column, Entity as SurveyEntity,
};
use crate::infra::storage::entity::survey_contributor;

/// ORM-based implementation of the `SurveysRepository` trait.
#[derive(Clone, Default)]
pub struct OrmSurveysRepository;

fn active_model(survey: &Survey) -> SurveyAM {
    SurveyAM {
        id: Set(survey.id),
        tenant_id: Set(survey.tenant_id),
        owner_id: Set(survey.owner_id),
        title: Set(survey.title.clone()),
        published: Set(survey.published),
        created_at: Set(survey.created_at),
        updated_at: Set(survey.updated_at),
    }
}

#[async_trait]
impl SurveysRepository for OrmSurveysRepository {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Survey>, DomainError> {
        let found = SurveyEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn list_by_owner<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        owner_id: Uuid,
    ) -> Result<Vec<Survey>, DomainError> {
        let rows = SurveyEntity::find()
            .filter(sea_orm::Condition::all().add(Expr::col(Column::OwnerId).eq(owner_id)))
            .order_by_desc(Column::CreatedAt)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_contributor<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<Vec<Survey>, DomainError> {
        let rows = SurveyEntity::find()
            .inner_join(survey_contributor::Entity)
            .filter(survey_contributor::Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_tenant<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant_id: Uuid,
        published: Option<bool>,
    ) -> Result<Vec<Survey>, DomainError> {
        let mut condition =
            sea_orm::Condition::all().add(Expr::col(Column::TenantId).eq(tenant_id));
        if let Some(published) = published {
            condition = condition.add(Column::Published.eq(published));
        }

        let rows = SurveyEntity::find()
            .filter(condition)
            .order_by_desc(Column::CreatedAt)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey: Survey,
    ) -> Result<Survey, DomainError> {
        active_model(&survey).insert(conn).await.map_err(db_err)?;
        Ok(survey)
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey: Survey,
    ) -> Result<Survey, DomainError> {
        active_model(&survey).update(conn).await.map_err(db_err)?;
        Ok(survey)
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = SurveyEntity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn contributor_ids<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError> {
        survey_contributor::Entity::find()
            .select_only()
            .column(survey_contributor::Column::UserId)
            .filter(survey_contributor::Column::SurveyId.eq(survey_id))
            .into_tuple::<Uuid>()
            .all(conn)
            .await
            .map_err(db_err)
    }

    async fn add_contributor<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), DomainError> {
        let m = survey_contributor::ActiveModel {
            survey_id: Set(survey_id),
            user_id: Set(user_id),
            created_at: Set(OffsetDateTime::now_utc()),
        };

        match m.insert(conn).await {
            Ok(_) => Ok(()),
            // Already a contributor: membership is a set.
            Err(e) if is_unique_violation(&e) => Ok(()),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn remove_contributors<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey_id: Uuid,
    ) -> Result<u64, DomainError> {
        let result = survey_contributor::Entity::delete_many()
            .filter(survey_contributor::Column::SurveyId.eq(survey_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}
