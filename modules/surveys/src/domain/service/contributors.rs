use std::sync::Arc;

use sea_orm::DatabaseConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::authorization::SurveyOperation;
use crate::domain::error::DomainError;
use crate::domain::model::{Caller, ContributorRequest, SurveyContributors};
use crate::domain::repos::{ContributorRequestsRepository, SurveysRepository, UsersRepository};
use crate::domain::service::validation::{normalize_email, validate_email};
use crate::domain::service::{begin, commit, load_authorized};

/// Contributor invitations.
///
/// An owner invites by email address; the invitation stays pending until a
/// user with that address signs in, at which point it is converted into a
/// contributor membership.
pub struct ContributorsService<CR, SR, UR> {
    requests: Arc<CR>,
    surveys: Arc<SR>,
    users: Arc<UR>,
    db: DatabaseConnection,
}

impl<CR, SR, UR> ContributorsService<CR, SR, UR>
where
    CR: ContributorRequestsRepository,
    SR: SurveysRepository,
    UR: UsersRepository,
{
    pub fn new(requests: Arc<CR>, surveys: Arc<SR>, users: Arc<UR>, db: DatabaseConnection) -> Self {
        Self {
            requests,
            surveys,
            users,
            db,
        }
    }

    pub async fn list_contributors(
        &self,
        caller: &Caller,
        survey_id: Uuid,
    ) -> Result<SurveyContributors, DomainError> {
        load_authorized(
            &*self.surveys,
            &self.db,
            caller,
            survey_id,
            SurveyOperation::Read,
        )
        .await?;

        let ids = self.surveys.contributor_ids(&self.db, survey_id).await?;
        let contributors = self.users.find_many(&self.db, &ids).await?;
        let requests = self.requests.list_for_survey(&self.db, survey_id).await?;

        Ok(SurveyContributors {
            survey_id,
            contributors,
            requests,
        })
    }

    /// Invite an email address to contribute to a survey.
    #[tracing::instrument(skip(self, caller, email), fields(user_id = %caller.user_id))]
    pub async fn add_request(
        &self,
        caller: &Caller,
        survey_id: Uuid,
        email: &str,
    ) -> Result<ContributorRequest, DomainError> {
        let survey = load_authorized(
            &*self.surveys,
            &self.db,
            caller,
            survey_id,
            SurveyOperation::ManageContributors,
        )
        .await?;
        let email = validate_email(email)?;

        let mut members = self.surveys.contributor_ids(&self.db, survey_id).await?;
        members.push(survey.owner_id);
        let member_users = self.users.find_many(&self.db, &members).await?;
        if member_users
            .iter()
            .any(|u| normalize_email(&u.email) == email)
        {
            return Err(DomainError::already_contributor(email));
        }

        if self
            .requests
            .find(&self.db, survey_id, &email)
            .await?
            .is_some()
        {
            return Err(DomainError::contributor_request_exists(email));
        }

        let request = ContributorRequest {
            id: Uuid::now_v7(),
            survey_id,
            email_address: email,
            created_at: OffsetDateTime::now_utc(),
        };
        let created = self.requests.create(&self.db, request).await?;
        tracing::info!(request_id = %created.id, "Created contributor request");
        Ok(created)
    }

    /// Convert pending requests addressed to the caller into memberships.
    ///
    /// Requests of surveys in other tenants stay pending. Returns the number
    /// of surveys the caller was added to.
    #[tracing::instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn process_pending(&self, caller: &Caller) -> Result<usize, DomainError> {
        let email = normalize_email(&caller.email);
        if email.is_empty() {
            return Ok(0);
        }

        let pending = self.requests.list_for_email(&self.db, &email).await?;
        let mut added = 0;

        for request in pending {
            let Some(survey) = self.surveys.get(&self.db, request.survey_id).await? else {
                self.requests.delete(&self.db, request.id).await?;
                continue;
            };
            if survey.tenant_id != caller.tenant_id {
                tracing::debug!(survey_id = %survey.id, "Skipping request from another tenant");
                continue;
            }

            let txn = begin(&self.db).await?;
            let contributors = self.surveys.contributor_ids(&txn, survey.id).await?;
            let is_member = survey.owner_id == caller.user_id || contributors.contains(&caller.user_id);
            if !is_member {
                self.surveys
                    .add_contributor(&txn, survey.id, caller.user_id)
                    .await?;
                added += 1;
            }
            self.requests.delete(&txn, request.id).await?;
            commit(txn).await?;
        }

        if added > 0 {
            tracing::info!(added, "Accepted pending contributor requests");
        }
        Ok(added)
    }
}
