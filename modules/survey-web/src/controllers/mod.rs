//! Request handlers and route table of the web front-end.

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::config::FormLimits;
use crate::state::{MaybeSignedIn, WebState};
use crate::views;

mod account;
mod contributors;
mod questions;
mod surveys;

pub(crate) fn validate_title(title: &str, limits: &FormLimits) -> Result<(), &'static str> {
    if title.is_empty() {
        Err("The title is required.")
    } else if title.chars().count() > limits.max_title_length {
        Err("The title is too long.")
    } else {
        Ok(())
    }
}

/// All pages and the OIDC callback.
pub fn router(state: WebState) -> Router {
    let callback_path = state.config.oidc.redirect_path.clone();

    Router::new()
        .route("/", get(account::home))
        .route("/account/signin", get(account::signin))
        .route("/account/signup", get(account::signup))
        .route("/account/signout", get(account::signout))
        .route(&callback_path, get(account::callback))
        .route("/surveys", get(surveys::index))
        .route("/surveys/published", get(surveys::published))
        .route("/surveys/tenant", get(surveys::tenant))
        .route("/surveys/new", get(surveys::new_form).post(surveys::create))
        .route("/surveys/{id}", get(surveys::details))
        .route("/surveys/{id}/edit", get(surveys::edit_form).post(surveys::edit))
        .route(
            "/surveys/{id}/delete",
            get(surveys::delete_confirm).post(surveys::delete),
        )
        .route(
            "/surveys/{id}/publish",
            get(surveys::publish_confirm).post(surveys::publish),
        )
        .route(
            "/surveys/{id}/unpublish",
            get(surveys::unpublish_confirm).post(surveys::unpublish),
        )
        .route("/surveys/{id}/contributors", get(contributors::list))
        .route(
            "/surveys/{id}/contributors/request",
            get(contributors::request_form).post(contributors::request),
        )
        .route(
            "/surveys/{id}/questions/new",
            get(questions::new_form).post(questions::create),
        )
        .route(
            "/questions/{id}/edit",
            get(questions::edit_form).post(questions::edit),
        )
        .route(
            "/questions/{id}/delete",
            get(questions::delete_confirm).post(questions::delete),
        )
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(MaybeSignedIn(session): MaybeSignedIn) -> Response {
    (StatusCode::NOT_FOUND, views::not_found(session.as_deref())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_limits() {
        let limits = FormLimits {
            max_title_length: 8,
            ..FormLimits::default()
        };
        assert!(validate_title("Lunch", &limits).is_ok());
        assert!(validate_title("", &limits).is_err());
        assert!(validate_title(&"x".repeat(8), &limits).is_ok());
        assert!(validate_title(&"x".repeat(9), &limits).is_err());
    }
}
