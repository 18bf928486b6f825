use std::sync::Arc;

use sea_orm::DatabaseConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::SurveysConfig;
use crate::domain::authorization::{SurveyOperation, authorize_create};
use crate::domain::error::DomainError;
use crate::domain::model::{
    Caller, NewSurvey, Survey, SurveyDetails, SurveyPatch, TenantSurveys, UserSurveys,
};
use crate::domain::repos::{ContributorRequestsRepository, QuestionsRepository, SurveysRepository};
use crate::domain::service::validation::validate_title;
use crate::domain::service::{begin, commit, load_authorized};

/// Survey lifecycle: creation, listings, edits, publishing and deletion.
pub struct SurveysService<SR, QR, CR> {
    surveys: Arc<SR>,
    questions: Arc<QR>,
    requests: Arc<CR>,
    db: DatabaseConnection,
    config: Arc<SurveysConfig>,
}

impl<SR, QR, CR> SurveysService<SR, QR, CR>
where
    SR: SurveysRepository,
    QR: QuestionsRepository,
    CR: ContributorRequestsRepository,
{
    pub fn new(
        surveys: Arc<SR>,
        questions: Arc<QR>,
        requests: Arc<CR>,
        db: DatabaseConnection,
        config: Arc<SurveysConfig>,
    ) -> Self {
        Self {
            surveys,
            questions,
            requests,
            db,
            config,
        }
    }

    #[tracing::instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn get_survey(&self, caller: &Caller, id: Uuid) -> Result<SurveyDetails, DomainError> {
        tracing::debug!("Getting survey by id");

        let survey =
            load_authorized(&*self.surveys, &self.db, caller, id, SurveyOperation::Read).await?;
        let questions = self.questions.list_for_survey(&self.db, id).await?;

        Ok(SurveyDetails { survey, questions })
    }

    /// Home page listings of one user.
    ///
    /// Users may only list their own surveys.
    #[tracing::instrument(skip(self, caller), fields(caller_id = %caller.user_id))]
    pub async fn list_for_user(
        &self,
        caller: &Caller,
        user_id: Uuid,
    ) -> Result<UserSurveys, DomainError> {
        if user_id != caller.user_id {
            return Err(DomainError::forbidden("cannot list surveys of another user"));
        }

        let published = self
            .surveys
            .list_by_tenant(&self.db, caller.tenant_id, Some(true))
            .await?;
        let own = self.surveys.list_by_owner(&self.db, user_id).await?;
        let contribute = self.surveys.list_by_contributor(&self.db, user_id).await?;

        tracing::debug!(
            published = published.len(),
            own = own.len(),
            contribute = contribute.len(),
            "Listed surveys for user"
        );
        Ok(UserSurveys {
            published,
            own,
            contribute,
        })
    }

    /// Every survey of a tenant, split by published state. Administrators only.
    #[tracing::instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn list_for_tenant(
        &self,
        caller: &Caller,
        tenant_id: Uuid,
    ) -> Result<TenantSurveys, DomainError> {
        if !caller.is_admin() || caller.tenant_id != tenant_id {
            return Err(DomainError::forbidden(
                "only tenant administrators can list all tenant surveys",
            ));
        }

        let (published, unpublished) = self
            .surveys
            .list_by_tenant(&self.db, tenant_id, None)
            .await?
            .into_iter()
            .partition(|s| s.published);

        Ok(TenantSurveys {
            published,
            unpublished,
        })
    }

    /// Published surveys of the caller's tenant.
    pub async fn list_published(&self, caller: &Caller) -> Result<Vec<Survey>, DomainError> {
        self.surveys
            .list_by_tenant(&self.db, caller.tenant_id, Some(true))
            .await
    }

    #[tracing::instrument(skip(self, caller, new_survey), fields(user_id = %caller.user_id))]
    pub async fn create_survey(
        &self,
        caller: &Caller,
        new_survey: NewSurvey,
    ) -> Result<Survey, DomainError> {
        authorize_create(caller)?;
        let title = validate_title(&new_survey.title, &self.config)?;

        let now = OffsetDateTime::now_utc();
        let survey = Survey {
            id: Uuid::now_v7(),
            tenant_id: caller.tenant_id,
            owner_id: caller.user_id,
            title,
            published: false,
            created_at: now,
            updated_at: now,
        };

        let created = self.surveys.create(&self.db, survey).await?;
        tracing::info!(survey_id = %created.id, "Created survey");
        Ok(created)
    }

    #[tracing::instrument(skip(self, caller, patch), fields(user_id = %caller.user_id))]
    pub async fn update_survey(
        &self,
        caller: &Caller,
        id: Uuid,
        patch: SurveyPatch,
    ) -> Result<Survey, DomainError> {
        let mut survey =
            load_authorized(&*self.surveys, &self.db, caller, id, SurveyOperation::Update).await?;

        survey.title = validate_title(&patch.title, &self.config)?;
        survey.updated_at = OffsetDateTime::now_utc();

        let updated = self.surveys.update(&self.db, survey).await?;
        tracing::info!("Updated survey");
        Ok(updated)
    }

    /// Delete a survey with its questions, contributors and pending requests.
    #[tracing::instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn delete_survey(&self, caller: &Caller, id: Uuid) -> Result<(), DomainError> {
        load_authorized(&*self.surveys, &self.db, caller, id, SurveyOperation::Delete).await?;

        let txn = begin(&self.db).await?;
        let questions = self.questions.delete_for_survey(&txn, id).await?;
        let requests = self.requests.delete_for_survey(&txn, id).await?;
        let contributors = self.surveys.remove_contributors(&txn, id).await?;
        if !self.surveys.delete(&txn, id).await? {
            return Err(DomainError::survey_not_found(id));
        }
        commit(txn).await?;

        tracing::info!(questions, requests, contributors, "Deleted survey");
        Ok(())
    }

    /// Make a survey visible to the whole tenant. Publishing twice is a no-op.
    pub async fn publish(&self, caller: &Caller, id: Uuid) -> Result<Survey, DomainError> {
        self.set_published(caller, id, true).await
    }

    pub async fn unpublish(&self, caller: &Caller, id: Uuid) -> Result<Survey, DomainError> {
        self.set_published(caller, id, false).await
    }

    #[tracing::instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    async fn set_published(
        &self,
        caller: &Caller,
        id: Uuid,
        published: bool,
    ) -> Result<Survey, DomainError> {
        let op = if published {
            SurveyOperation::Publish
        } else {
            SurveyOperation::Unpublish
        };
        let mut survey = load_authorized(&*self.surveys, &self.db, caller, id, op).await?;

        if survey.published == published {
            tracing::debug!("Survey already in requested state");
            return Ok(survey);
        }

        survey.published = published;
        survey.updated_at = OffsetDateTime::now_utc();
        let updated = self.surveys.update(&self.db, survey).await?;
        tracing::info!("Changed survey published state");
        Ok(updated)
    }
}
