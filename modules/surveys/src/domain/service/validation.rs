use crate::config::SurveysConfig;
use crate::domain::error::DomainError;
use crate::domain::model::{QuestionDraft, QuestionType};

pub(crate) fn validate_title(title: &str, config: &SurveysConfig) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::validation("title", "Title cannot be empty"));
    }
    let len = title.chars().count();
    if len > config.max_title_length {
        return Err(DomainError::validation(
            "title",
            format!(
                "Title too long: {len} characters (max: {})",
                config.max_title_length
            ),
        ));
    }
    Ok(title.to_owned())
}

pub(crate) fn validate_question(
    draft: QuestionDraft,
    config: &SurveysConfig,
) -> Result<QuestionDraft, DomainError> {
    let text = draft.text.trim().to_owned();
    if text.is_empty() {
        return Err(DomainError::validation("text", "Question text cannot be empty"));
    }
    let len = text.chars().count();
    if len > config.max_question_length {
        return Err(DomainError::validation(
            "text",
            format!(
                "Question text too long: {len} characters (max: {})",
                config.max_question_length
            ),
        ));
    }

    let possible_answers: Vec<String> = match draft.question_type {
        QuestionType::MultipleChoice => draft
            .possible_answers
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        QuestionType::SimpleText | QuestionType::FiveStars => Vec::new(),
    };

    if draft.question_type == QuestionType::MultipleChoice {
        if possible_answers.is_empty() {
            return Err(DomainError::validation(
                "possible_answers",
                "A multiple choice question needs at least one answer",
            ));
        }
        if possible_answers.len() > config.max_possible_answers {
            return Err(DomainError::validation(
                "possible_answers",
                format!(
                    "Too many answers: {} (max: {})",
                    possible_answers.len(),
                    config.max_possible_answers
                ),
            ));
        }
        if possible_answers.iter().any(|a| a.contains('\n')) {
            return Err(DomainError::validation(
                "possible_answers",
                "Answers cannot span several lines",
            ));
        }
    }

    Ok(QuestionDraft {
        text,
        question_type: draft.question_type,
        possible_answers,
    })
}

/// Trim and lower-case an email address.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn validate_email(email: &str) -> Result<String, DomainError> {
    let email = normalize_email(email);
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(DomainError::validation(
            "email_address",
            format!("'{email}' is not a valid email address"),
        ))
    }
}
