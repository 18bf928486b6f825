use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::clients::{ServiceError, models::ContributorRequestInput};
use crate::state::{Page, SignedIn, WebState};
use crate::views;

const ALREADY_INVOLVED: &str =
    "This person is already a contributor or has already been invited to this survey.";

#[derive(Debug, Deserialize)]
pub struct ContributorRequestForm {
    #[serde(default)]
    email_address: String,
}

#[tracing::instrument(name = "web.contributors.list", skip_all, fields(survey_id = %id))]
pub async fn list(State(state): State<WebState>, user: SignedIn, Path(id): Path<Uuid>) -> Page {
    let contributors = state
        .surveys
        .get_contributors(user.token(), id)
        .await
        .map_err(|e| user.fail(e))?;
    Ok(views::contributors(&user.session, &contributors).into_response())
}

pub async fn request_form(user: SignedIn, Path(id): Path<Uuid>) -> Response {
    views::contributor_request_form(&user.session, id, "", None).into_response()
}

/// Invite a contributor by email.
///
/// Someone already contributing or invited gets the form back with a
/// message and no request is created.
#[tracing::instrument(name = "web.contributors.request", skip_all, fields(survey_id = %id))]
pub async fn request(
    State(state): State<WebState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
    Form(form): Form<ContributorRequestForm>,
) -> Page {
    let email = form.email_address.trim();
    if !is_plausible_email(email) {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            views::contributor_request_form(
                &user.session,
                id,
                email,
                Some("Enter a valid email address."),
            ),
        )
            .into_response());
    }

    let current = state
        .surveys
        .get_contributors(user.token(), id)
        .await
        .map_err(|e| user.fail(e))?;
    if current.involves(email) {
        tracing::debug!("invitee already involved with survey");
        return Ok(
            views::contributor_request_form(&user.session, id, email, Some(ALREADY_INVOLVED))
                .into_response(),
        );
    }

    let input = ContributorRequestInput {
        email_address: email.to_owned(),
    };
    match state
        .surveys
        .add_contributor_request(user.token(), id, &input)
        .await
    {
        Ok(request) => {
            tracing::info!(request_id = %request.id, "contributor invited");
            Ok(Redirect::to(&format!("/surveys/{id}/contributors")).into_response())
        }
        // The owner's own address, or an invitation that raced this one.
        Err(ServiceError::Conflict { .. }) => Ok(views::contributor_request_form(
            &user.session,
            id,
            email,
            Some(ALREADY_INVOLVED),
        )
        .into_response()),
        Err(ServiceError::Invalid { message }) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            views::contributor_request_form(&user.session, id, email, Some(&message)),
        )
            .into_response()),
        Err(e) => Err(user.fail(e)),
    }
}

/// One `@` with a non-empty local part and domain, and no whitespace.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
