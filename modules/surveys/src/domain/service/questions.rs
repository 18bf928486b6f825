use std::sync::Arc;

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::config::SurveysConfig;
use crate::domain::authorization::SurveyOperation;
use crate::domain::error::DomainError;
use crate::domain::model::{Caller, Question, QuestionDraft};
use crate::domain::repos::{QuestionsRepository, SurveysRepository};
use crate::domain::service::load_authorized;
use crate::domain::service::validation::validate_question;

/// Questions are authorized through their parent survey: reading needs
/// `Read`, any change needs `Update`.
pub struct QuestionsService<QR, SR> {
    questions: Arc<QR>,
    surveys: Arc<SR>,
    db: DatabaseConnection,
    config: Arc<SurveysConfig>,
}

impl<QR, SR> QuestionsService<QR, SR>
where
    QR: QuestionsRepository,
    SR: SurveysRepository,
{
    pub fn new(
        questions: Arc<QR>,
        surveys: Arc<SR>,
        db: DatabaseConnection,
        config: Arc<SurveysConfig>,
    ) -> Self {
        Self {
            questions,
            surveys,
            db,
            config,
        }
    }

    async fn find(&self, id: Uuid) -> Result<Question, DomainError> {
        self.questions
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::question_not_found(id))
    }

    pub async fn get_question(&self, caller: &Caller, id: Uuid) -> Result<Question, DomainError> {
        let question = self.find(id).await?;
        load_authorized(
            &*self.surveys,
            &self.db,
            caller,
            question.survey_id,
            SurveyOperation::Read,
        )
        .await?;
        Ok(question)
    }

    pub async fn list_questions(
        &self,
        caller: &Caller,
        survey_id: Uuid,
    ) -> Result<Vec<Question>, DomainError> {
        load_authorized(&*self.surveys, &self.db, caller, survey_id, SurveyOperation::Read).await?;
        self.questions.list_for_survey(&self.db, survey_id).await
    }

    #[tracing::instrument(skip(self, caller, draft), fields(user_id = %caller.user_id))]
    pub async fn add_question(
        &self,
        caller: &Caller,
        survey_id: Uuid,
        draft: QuestionDraft,
    ) -> Result<Question, DomainError> {
        load_authorized(&*self.surveys, &self.db, caller, survey_id, SurveyOperation::Update)
            .await?;
        let draft = validate_question(draft, &self.config)?;

        let question = Question {
            id: Uuid::now_v7(),
            survey_id,
            text: draft.text,
            question_type: draft.question_type,
            possible_answers: draft.possible_answers,
        };
        let created = self.questions.create(&self.db, question).await?;
        tracing::info!(question_id = %created.id, "Added question");
        Ok(created)
    }

    /// Replace the content of a question. The parent survey cannot change.
    #[tracing::instrument(skip(self, caller, draft), fields(user_id = %caller.user_id))]
    pub async fn update_question(
        &self,
        caller: &Caller,
        id: Uuid,
        draft: QuestionDraft,
    ) -> Result<Question, DomainError> {
        let mut question = self.find(id).await?;
        load_authorized(
            &*self.surveys,
            &self.db,
            caller,
            question.survey_id,
            SurveyOperation::Update,
        )
        .await?;
        let draft = validate_question(draft, &self.config)?;

        question.text = draft.text;
        question.question_type = draft.question_type;
        question.possible_answers = draft.possible_answers;

        let updated = self.questions.update(&self.db, question).await?;
        tracing::info!("Updated question");
        Ok(updated)
    }

    #[tracing::instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn delete_question(&self, caller: &Caller, id: Uuid) -> Result<(), DomainError> {
        let question = self.find(id).await?;
        load_authorized(
            &*self.surveys,
            &self.db,
            caller,
            question.survey_id,
            SurveyOperation::Update,
        )
        .await?;

        if !self.questions.delete(&self.db, id).await? {
            return Err(DomainError::question_not_found(id));
        }
        tracing::info!("Deleted question");
        Ok(())
    }
}
