use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::clients::{ServiceError, models::SurveyInput};
use crate::controllers::validate_title;
use crate::state::{Page, SignedIn, WebState};
use crate::views::{self, SurveyAction};

#[derive(Debug, Deserialize)]
pub struct SurveyForm {
    #[serde(default)]
    title: String,
}

/// Home list. Pending invitations for the user are consumed first so that
/// freshly accepted surveys show up under "contribute".
#[tracing::instrument(name = "web.surveys.index", skip_all, fields(user_id = %user.session.user_id))]
pub async fn index(State(state): State<WebState>, user: SignedIn) -> Page {
    state
        .surveys
        .process_pending_contributor_requests(user.token())
        .await
        .map_err(|e| user.fail(e))?;

    let surveys = state
        .surveys
        .list_for_user(user.token(), user.session.user_id)
        .await
        .map_err(|e| user.fail(e))?;

    Ok(views::my_surveys(&user.session, &surveys).into_response())
}

#[tracing::instrument(name = "web.surveys.published", skip_all)]
pub async fn published(State(state): State<WebState>, user: SignedIn) -> Page {
    let surveys = state
        .surveys
        .list_published(user.token())
        .await
        .map_err(|e| user.fail(e))?;
    Ok(views::published(&user.session, &surveys).into_response())
}

#[tracing::instrument(name = "web.surveys.tenant", skip_all, fields(tenant_id = %user.session.tenant_id))]
pub async fn tenant(State(state): State<WebState>, user: SignedIn) -> Page {
    if !user.session.is_admin() {
        return Err(user.fail(ServiceError::Forbidden));
    }
    let surveys = state
        .surveys
        .list_for_tenant(user.token(), user.session.tenant_id)
        .await
        .map_err(|e| user.fail(e))?;
    Ok(views::tenant_surveys(&user.session, &surveys).into_response())
}

pub async fn new_form(user: SignedIn) -> Response {
    views::survey_form(&user.session, None, "", None, false).into_response()
}

#[tracing::instrument(name = "web.surveys.create", skip_all)]
pub async fn create(
    State(state): State<WebState>,
    user: SignedIn,
    Form(form): Form<SurveyForm>,
) -> Page {
    let title = form.title.trim();
    if let Err(message) = validate_title(title, &state.config.limits) {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            views::survey_form(&user.session, None, title, Some(message), false),
        )
            .into_response());
    }

    let input = SurveyInput {
        title: title.to_owned(),
    };
    match state.surveys.create_survey(user.token(), &input).await {
        Ok(survey) => {
            tracing::info!(survey_id = %survey.id, "survey created");
            Ok(Redirect::to(&format!("/surveys/{}", survey.id)).into_response())
        }
        Err(ServiceError::Forbidden) => Ok((
            StatusCode::FORBIDDEN,
            views::survey_form(&user.session, None, title, None, true),
        )
            .into_response()),
        Err(ServiceError::Invalid { message }) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            views::survey_form(&user.session, None, title, Some(&message), false),
        )
            .into_response()),
        Err(e) => Err(user.fail(e)),
    }
}

#[tracing::instrument(name = "web.surveys.details", skip_all, fields(survey_id = %id))]
pub async fn details(
    State(state): State<WebState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
) -> Page {
    let survey = state
        .surveys
        .get_survey(user.token(), id)
        .await
        .map_err(|e| user.fail(e))?;
    Ok(views::survey_details(&user.session, &survey).into_response())
}

#[tracing::instrument(name = "web.surveys.edit_form", skip_all, fields(survey_id = %id))]
pub async fn edit_form(
    State(state): State<WebState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
) -> Page {
    let survey = state
        .surveys
        .get_survey(user.token(), id)
        .await
        .map_err(|e| user.fail(e))?;
    Ok(views::survey_form(&user.session, Some(id), &survey.title, None, false).into_response())
}

/// A denied update re-renders the form with the Forbidden flag.
#[tracing::instrument(name = "web.surveys.edit", skip_all, fields(survey_id = %id))]
pub async fn edit(
    State(state): State<WebState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
    Form(form): Form<SurveyForm>,
) -> Page {
    let title = form.title.trim();
    if let Err(message) = validate_title(title, &state.config.limits) {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            views::survey_form(&user.session, Some(id), title, Some(message), false),
        )
            .into_response());
    }

    let input = SurveyInput {
        title: title.to_owned(),
    };
    match state.surveys.update_survey(user.token(), id, &input).await {
        Ok(_) => Ok(Redirect::to(&format!("/surveys/{id}")).into_response()),
        Err(ServiceError::Forbidden) => Ok((
            StatusCode::FORBIDDEN,
            views::survey_form(&user.session, Some(id), title, None, true),
        )
            .into_response()),
        Err(ServiceError::Invalid { message }) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            views::survey_form(&user.session, Some(id), title, Some(&message), false),
        )
            .into_response()),
        Err(e) => Err(user.fail(e)),
    }
}

#[tracing::instrument(name = "web.surveys.delete_confirm", skip_all, fields(survey_id = %id))]
pub async fn delete_confirm(
    State(state): State<WebState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
) -> Page {
    let survey = state
        .surveys
        .get_survey(user.token(), id)
        .await
        .map_err(|e| user.fail(e))?;
    Ok(views::confirm(&user.session, &survey, SurveyAction::Delete).into_response())
}

#[tracing::instrument(name = "web.surveys.delete", skip_all, fields(survey_id = %id))]
pub async fn delete(
    State(state): State<WebState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
) -> Page {
    state
        .surveys
        .delete_survey(user.token(), id)
        .await
        .map_err(|e| user.fail(e))?;
    tracing::info!("survey deleted");
    Ok(Redirect::to("/surveys").into_response())
}

pub async fn publish_confirm(
    State(state): State<WebState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
) -> Page {
    toggle_confirm(&state, &user, id, SurveyAction::Publish).await
}

pub async fn publish(
    State(state): State<WebState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
) -> Page {
    toggle(&state, &user, id, SurveyAction::Publish).await
}

pub async fn unpublish_confirm(
    State(state): State<WebState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
) -> Page {
    toggle_confirm(&state, &user, id, SurveyAction::Unpublish).await
}

pub async fn unpublish(
    State(state): State<WebState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
) -> Page {
    toggle(&state, &user, id, SurveyAction::Unpublish).await
}

/// Target `published` value of a toggle action.
fn target_state(action: SurveyAction) -> bool {
    action == SurveyAction::Publish
}

fn already_message(action: SurveyAction) -> &'static str {
    if target_state(action) {
        "This survey is already published."
    } else {
        "This survey is not published."
    }
}

async fn toggle_confirm(state: &WebState, user: &SignedIn, id: Uuid, action: SurveyAction) -> Page {
    let survey = state
        .surveys
        .get_survey(user.token(), id)
        .await
        .map_err(|e| user.fail(e))?;

    if survey.published == target_state(action) {
        return Ok(views::message(
            &user.session,
            &survey.title,
            already_message(action),
            &format!("/surveys/{id}"),
        )
        .into_response());
    }
    Ok(views::confirm(&user.session, &survey, action).into_response())
}

/// Publish or unpublish; a survey already in the target state is left alone.
#[tracing::instrument(name = "web.surveys.toggle", skip(state, user), fields(survey_id = %id))]
async fn toggle(state: &WebState, user: &SignedIn, id: Uuid, action: SurveyAction) -> Page {
    let survey = state
        .surveys
        .get_survey(user.token(), id)
        .await
        .map_err(|e| user.fail(e))?;

    if survey.published == target_state(action) {
        tracing::debug!(published = survey.published, "survey already in requested state");
        return Ok(views::message(
            &user.session,
            &survey.title,
            already_message(action),
            &format!("/surveys/{id}"),
        )
        .into_response());
    }

    let result = if target_state(action) {
        state.surveys.publish(user.token(), id).await
    } else {
        state.surveys.unpublish(user.token(), id).await
    };
    let survey = result.map_err(|e| user.fail(e))?;
    tracing::info!(published = survey.published, "survey publication changed");

    Ok(Redirect::to(&format!("/surveys/{id}")).into_response())
}
