//! Per-survey authorization.
//!
//! A caller's permissions on a survey are derived from their roles, their
//! tenant and their relation to the survey. Each operation lists the
//! permissions that allow it.

use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Caller, Survey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyOperation {
    Create,
    Read,
    Update,
    Delete,
    Publish,
    Unpublish,
    ManageContributors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Tenant administrator of the survey's tenant
    Admin,
    /// Survey creator within the survey's tenant
    Creator,
    Owner,
    Contributor,
}

impl SurveyOperation {
    fn allowed(self) -> &'static [Permission] {
        match self {
            SurveyOperation::Create => &[Permission::Creator, Permission::Admin],
            SurveyOperation::Read => &[
                Permission::Creator,
                Permission::Admin,
                Permission::Owner,
                Permission::Contributor,
            ],
            SurveyOperation::Update => {
                &[Permission::Admin, Permission::Owner, Permission::Contributor]
            }
            SurveyOperation::Delete
            | SurveyOperation::Publish
            | SurveyOperation::Unpublish
            | SurveyOperation::ManageContributors => &[Permission::Admin, Permission::Owner],
        }
    }
}

/// Permissions the caller holds on the survey.
#[must_use]
pub fn permissions(caller: &Caller, survey: &Survey, contributor_ids: &[Uuid]) -> Vec<Permission> {
    let mut granted = Vec::new();
    let same_tenant = survey.tenant_id == caller.tenant_id;

    if same_tenant && caller.is_admin() {
        granted.push(Permission::Admin);
    }
    if same_tenant && caller.is_creator() {
        granted.push(Permission::Creator);
    }
    if survey.owner_id == caller.user_id {
        granted.push(Permission::Owner);
    }
    if contributor_ids.contains(&caller.user_id) {
        granted.push(Permission::Contributor);
    }
    granted
}

/// Check `op` on an existing survey.
///
/// Published surveys are readable by every user of their tenant.
pub fn authorize(
    caller: &Caller,
    survey: &Survey,
    contributor_ids: &[Uuid],
    op: SurveyOperation,
) -> Result<(), DomainError> {
    if op == SurveyOperation::Read && survey.published && survey.tenant_id == caller.tenant_id {
        return Ok(());
    }

    let granted = permissions(caller, survey, contributor_ids);
    if op.allowed().iter().any(|p| granted.contains(p)) {
        Ok(())
    } else {
        tracing::debug!(
            survey_id = %survey.id,
            user_id = %caller.user_id,
            operation = ?op,
            "survey operation denied"
        );
        Err(DomainError::forbidden(format!(
            "not allowed to {} survey {}",
            op.verb(),
            survey.id
        )))
    }
}

/// Creation has no survey yet; only the caller's roles count.
pub fn authorize_create(caller: &Caller) -> Result<(), DomainError> {
    if caller.is_creator() || caller.is_admin() {
        Ok(())
    } else {
        Err(DomainError::forbidden("not allowed to create surveys"))
    }
}

impl SurveyOperation {
    fn verb(self) -> &'static str {
        match self {
            SurveyOperation::Create => "create",
            SurveyOperation::Read => "read",
            SurveyOperation::Update => "update",
            SurveyOperation::Delete => "delete",
            SurveyOperation::Publish => "publish",
            SurveyOperation::Unpublish => "unpublish",
            SurveyOperation::ManageContributors => "manage contributors of",
        }
    }
}
