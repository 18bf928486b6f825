use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::clients::{
    ServiceError,
    models::{QuestionInput, QuestionType},
};
use crate::config::FormLimits;
use crate::state::{Page, SignedIn, WebState};
use crate::views::{self, QuestionFormValues};

#[derive(Debug, Deserialize)]
pub struct QuestionForm {
    #[serde(default)]
    text: String,
    #[serde(default)]
    question_type: String,
    #[serde(default)]
    possible_answers: String,
}

impl QuestionForm {
    fn values(&self) -> QuestionFormValues {
        QuestionFormValues {
            text: self.text.trim().to_owned(),
            question_type: QuestionType::parse(&self.question_type),
            possible_answers: self.possible_answers.clone(),
        }
    }

    /// Validated API input; answers are taken one per non-blank line.
    fn input(&self, limits: &FormLimits) -> Result<QuestionInput, String> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err("The question text is required.".to_owned());
        }
        if text.chars().count() > limits.max_question_length {
            return Err("The question text is too long.".to_owned());
        }
        let question_type = QuestionType::parse(&self.question_type)
            .ok_or_else(|| "Choose a question type.".to_owned())?;

        let possible_answers: Vec<String> = if question_type == QuestionType::MultipleChoice {
            self.possible_answers
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        } else {
            Vec::new()
        };
        if question_type == QuestionType::MultipleChoice {
            if possible_answers.is_empty() {
                return Err(
                    "A multiple choice question needs at least one possible answer.".to_owned(),
                );
            }
            if possible_answers.len() > limits.max_possible_answers {
                return Err(format!(
                    "A question can have at most {} possible answers.",
                    limits.max_possible_answers
                ));
            }
        }

        Ok(QuestionInput {
            text: text.to_owned(),
            question_type,
            possible_answers,
        })
    }
}

pub async fn new_form(user: SignedIn, Path(survey_id): Path<Uuid>) -> Response {
    let values = QuestionFormValues {
        question_type: Some(QuestionType::SimpleText),
        ..QuestionFormValues::default()
    };
    views::question_form(
        &user.session,
        &format!("/surveys/{survey_id}/questions/new"),
        &values,
        None,
        false,
    )
    .into_response()
}

#[tracing::instrument(name = "web.questions.create", skip_all, fields(survey_id = %survey_id))]
pub async fn create(
    State(state): State<WebState>,
    user: SignedIn,
    Path(survey_id): Path<Uuid>,
    Form(form): Form<QuestionForm>,
) -> Page {
    let action = format!("/surveys/{survey_id}/questions/new");
    let input = match form.input(&state.config.limits) {
        Ok(input) => input,
        Err(message) => return Ok(invalid(&user, &action, &form, &message)),
    };

    match state.questions.add_question(user.token(), survey_id, &input).await {
        Ok(question) => {
            tracing::info!(question_id = %question.id, "question added");
            Ok(Redirect::to(&format!("/surveys/{survey_id}")).into_response())
        }
        Err(ServiceError::Forbidden) => Ok(forbidden(&user, &action, &form)),
        Err(ServiceError::Invalid { message }) => Ok(invalid(&user, &action, &form, &message)),
        Err(e) => Err(user.fail(e)),
    }
}

#[tracing::instrument(name = "web.questions.edit_form", skip_all, fields(question_id = %id))]
pub async fn edit_form(
    State(state): State<WebState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
) -> Page {
    let question = state
        .questions
        .get_question(user.token(), id)
        .await
        .map_err(|e| user.fail(e))?;
    Ok(views::question_form(
        &user.session,
        &format!("/questions/{id}/edit"),
        &QuestionFormValues::from(&question),
        None,
        false,
    )
    .into_response())
}

#[tracing::instrument(name = "web.questions.edit", skip_all, fields(question_id = %id))]
pub async fn edit(
    State(state): State<WebState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
    Form(form): Form<QuestionForm>,
) -> Page {
    let action = format!("/questions/{id}/edit");
    let input = match form.input(&state.config.limits) {
        Ok(input) => input,
        Err(message) => return Ok(invalid(&user, &action, &form, &message)),
    };

    match state.questions.update_question(user.token(), id, &input).await {
        Ok(question) => Ok(Redirect::to(&format!("/surveys/{}", question.survey_id)).into_response()),
        Err(ServiceError::Forbidden) => Ok(forbidden(&user, &action, &form)),
        Err(ServiceError::Invalid { message }) => Ok(invalid(&user, &action, &form, &message)),
        Err(e) => Err(user.fail(e)),
    }
}

#[tracing::instrument(name = "web.questions.delete_confirm", skip_all, fields(question_id = %id))]
pub async fn delete_confirm(
    State(state): State<WebState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
) -> Page {
    let question = state
        .questions
        .get_question(user.token(), id)
        .await
        .map_err(|e| user.fail(e))?;
    Ok(views::question_delete_confirm(&user.session, &question).into_response())
}

#[tracing::instrument(name = "web.questions.delete", skip_all, fields(question_id = %id))]
pub async fn delete(
    State(state): State<WebState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
) -> Page {
    let question = state
        .questions
        .get_question(user.token(), id)
        .await
        .map_err(|e| user.fail(e))?;
    state
        .questions
        .delete_question(user.token(), id)
        .await
        .map_err(|e| user.fail(e))?;
    tracing::info!(survey_id = %question.survey_id, "question deleted");
    Ok(Redirect::to(&format!("/surveys/{}", question.survey_id)).into_response())
}

fn invalid(user: &SignedIn, action: &str, form: &QuestionForm, message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        views::question_form(&user.session, action, &form.values(), Some(message), false),
    )
        .into_response()
}

fn forbidden(user: &SignedIn, action: &str, form: &QuestionForm) -> Response {
    (
        StatusCode::FORBIDDEN,
        views::question_form(&user.session, action, &form.values(), None, true),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(question_type: &str, answers: &str) -> QuestionForm {
        QuestionForm {
            text: "  Favourite colour? ".to_owned(),
            question_type: question_type.to_owned(),
            possible_answers: answers.to_owned(),
        }
    }

    #[test]
    fn answers_are_split_by_line() {
        let input = form("MultipleChoice", "Red\r\n\n  Blue  \nGreen")
            .input(&FormLimits::default())
            .unwrap();
        assert_eq!(input.text, "Favourite colour?");
        assert_eq!(input.possible_answers, vec!["Red", "Blue", "Green"]);
    }

    #[test]
    fn multiple_choice_needs_answers() {
        assert!(form("MultipleChoice", " \n ").input(&FormLimits::default()).is_err());
    }

    #[test]
    fn answers_are_dropped_for_other_types() {
        let input = form("FiveStars", "ignored").input(&FormLimits::default()).unwrap();
        assert!(input.possible_answers.is_empty());
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(form("Essay", "").input(&FormLimits::default()).is_err());
    }

    #[test]
    fn answer_count_is_bounded() {
        let limits = FormLimits {
            max_possible_answers: 2,
            ..FormLimits::default()
        };
        assert!(form("MultipleChoice", "Red\nBlue").input(&limits).is_ok());
        let err = form("MultipleChoice", "Red\nBlue\nGreen").input(&limits).unwrap_err();
        assert!(err.contains("at most 2"));
    }

    #[test]
    fn question_length_follows_limits() {
        let limits = FormLimits {
            max_question_length: 5,
            ..FormLimits::default()
        };
        let short = QuestionForm {
            text: "Why?".to_owned(),
            question_type: "SimpleText".to_owned(),
            possible_answers: String::new(),
        };
        assert!(short.input(&limits).is_ok());
        assert!(form("SimpleText", "").input(&limits).is_err());
    }
}
