use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::Question;
use crate::domain::repos::QuestionsRepository;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::question::{
    ActiveModel as QuestionAM, Column, Entity as QuestionEntity,
};
use crate::infra::storage::mapper::join_answers;

/// ORM-based implementation of the `QuestionsRepository` trait.
#[derive(Clone, Default)]
pub struct OrmQuestionsRepository;

#[async_trait]
impl QuestionsRepository for OrmQuestionsRepository {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Question>, DomainError> {
        QuestionEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?
            .map(Question::try_from)
            .transpose()
    }

    async fn list_for_survey<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        survey_id: Uuid,
    ) -> Result<Vec<Question>, DomainError> {
        QuestionEntity::find()
            .filter(Column::SurveyId.eq(survey_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(Question::try_from)
            .collect()
    }

    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        question: Question,
    ) -> Result<Question, DomainError> {
        let m = QuestionAM {
            id: Set(question.id),
            survey_id: Set(question.survey_id),
            text: Set(question.text.clone()),
            question_type: Set(question.question_type.as_str().to_owned()),
            possible_answers: Set(join_answers(&question.possible_answers)),
            created_at: Set(OffsetDateTime::now_utc()),
        };

        m.insert(conn).await.map_err(db_err)?;
        Ok(question)
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        question: Question,
    ) -> Result<Question, DomainError> {
        // created_at keeps the question's position
        let m = QuestionAM {
            id: Set(question.id),
            text: Set(question.text.clone()),
            question_type: Set(question.question_type.as_str().to_owned()),
            possible_answers: Set(join_answers(&question.possible_answers)),
            ..Default::default()
        };

        m.update(conn).await.map_err(db_err)?;
        Ok(question)
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = QuestionEntity::delete_by_id(id)
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
        let result = QuestionEntity::delete_many()
            .filter(Column::SurveyId.eq(survey_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}
