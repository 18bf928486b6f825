//! Server-rendered HTML pages.

use axum::response::Html;
use uuid::Uuid;

use crate::clients::models::{
    Contributors, Question, QuestionType, Survey, SurveySummary, TenantSurveys, UserSurveys,
};
use crate::session::Session;

/// Escape text for HTML element content and quoted attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(title: &str, session: Option<&Session>, body: &str) -> Html<String> {
    let nav = match session {
        Some(s) => {
            let mut links = String::from(
                r#"<a href="/surveys">My surveys</a> <a href="/surveys/published">Published</a>"#,
            );
            if s.is_creator() {
                links.push_str(r#" <a href="/surveys/new">New survey</a>"#);
            }
            if s.is_admin() {
                links.push_str(r#" <a href="/surveys/tenant">Tenant surveys</a>"#);
            }
            format!(
                r#"{links} <span class="user">{}</span> <a href="/account/signout">Sign out</a>"#,
                escape(&s.display_name)
            )
        }
        None => {
            r#"<a href="/account/signin">Sign in</a> <a href="/account/signup">Sign up your organization</a>"#
                .to_owned()
        }
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Surveys</title>
</head>
<body>
<nav><a href="/">Surveys</a> {nav}</nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    ))
}

fn notice(message: Option<&str>) -> String {
    message
        .map(|m| format!(r#"<p class="notice">{}</p>"#, escape(m)))
        .unwrap_or_default()
}

fn survey_list(heading: &str, surveys: &[SurveySummary]) -> String {
    let mut html = format!("<h2>{}</h2>", escape(heading));
    if surveys.is_empty() {
        html.push_str("<p>None.</p>");
        return html;
    }
    html.push_str("<ul>");
    for s in surveys {
        html.push_str(&format!(
            r#"<li><a href="/surveys/{}">{}</a>{}</li>"#,
            s.id,
            escape(&s.title),
            if s.published { " (published)" } else { "" }
        ));
    }
    html.push_str("</ul>");
    html
}

pub fn home(session: Option<&Session>) -> Html<String> {
    let body = match session {
        Some(s) => format!(
            r#"<p>Welcome, {}.</p><p><a href="/surveys">Go to your surveys</a></p>"#,
            escape(&s.display_name)
        ),
        None => "<p>Create surveys and collaborate on them with your organization.</p>".to_owned(),
    };
    layout("Welcome", session, &body)
}

pub fn my_surveys(session: &Session, surveys: &UserSurveys) -> Html<String> {
    let body = [
        survey_list("My surveys", &surveys.own),
        survey_list("Surveys I contribute to", &surveys.contribute),
        survey_list("Published in my organization", &surveys.published),
    ]
    .concat();
    layout("Surveys", Some(session), &body)
}

pub fn published(session: &Session, surveys: &[SurveySummary]) -> Html<String> {
    layout(
        "Published surveys",
        Some(session),
        &survey_list("Published", surveys),
    )
}

pub fn tenant_surveys(session: &Session, surveys: &TenantSurveys) -> Html<String> {
    let body = [
        survey_list("Published", &surveys.published),
        survey_list("Unpublished", &surveys.unpublished),
    ]
    .concat();
    layout("Tenant surveys", Some(session), &body)
}

/// Create or edit form. `survey_id` is `None` for creation.
pub fn survey_form(
    session: &Session,
    survey_id: Option<Uuid>,
    title: &str,
    message: Option<&str>,
    forbidden: bool,
) -> Html<String> {
    let (heading, action) = match survey_id {
        Some(id) => ("Edit survey", format!("/surveys/{id}/edit")),
        None => ("New survey", "/surveys/new".to_owned()),
    };
    let forbidden_note = if forbidden {
        r#"<p class="forbidden">Forbidden: you are not allowed to edit this survey.</p>"#
    } else {
        ""
    };
    let body = format!(
        r#"{forbidden_note}{}<form method="post" action="{action}">
<label>Title <input name="title" value="{}" required></label>
<button type="submit">Save</button>
</form>"#,
        notice(message),
        escape(title),
    );
    layout(heading, Some(session), &body)
}

pub fn survey_details(session: &Session, survey: &Survey) -> Html<String> {
    let mut body = format!(
        "<p>Status: {}</p>",
        if survey.published {
            "published"
        } else {
            "draft"
        }
    );
    body.push_str("<h2>Questions</h2>");
    if survey.questions.is_empty() {
        body.push_str("<p>No questions yet.</p>");
    } else {
        body.push_str("<ol>");
        for q in &survey.questions {
            body.push_str(&question_item(q));
        }
        body.push_str("</ol>");
    }
    body.push_str(&format!(
        r#"<p><a href="/surveys/{id}/questions/new">Add question</a>
<a href="/surveys/{id}/edit">Edit</a>
<a href="/surveys/{id}/contributors">Contributors</a>
<a href="/surveys/{id}/{toggle}">{toggle_label}</a>
<a href="/surveys/{id}/delete">Delete</a></p>"#,
        id = survey.id,
        toggle = if survey.published { "unpublish" } else { "publish" },
        toggle_label = if survey.published {
            "Unpublish"
        } else {
            "Publish"
        },
    ));
    layout(&survey.title, Some(session), &body)
}

fn question_item(q: &Question) -> String {
    let mut html = format!(
        "<li>{} <small>{}</small>",
        escape(&q.text),
        q.question_type.label()
    );
    if !q.possible_answers.is_empty() {
        html.push_str("<ul>");
        for answer in &q.possible_answers {
            html.push_str(&format!("<li>{}</li>", escape(answer)));
        }
        html.push_str("</ul>");
    }
    html.push_str(&format!(
        r#" <a href="/questions/{id}/edit">Edit</a> <a href="/questions/{id}/delete">Delete</a></li>"#,
        id = q.id
    ));
    html
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyAction {
    Delete,
    Publish,
    Unpublish,
}

impl SurveyAction {
    fn path(self) -> &'static str {
        match self {
            SurveyAction::Delete => "delete",
            SurveyAction::Publish => "publish",
            SurveyAction::Unpublish => "unpublish",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            SurveyAction::Delete => "Delete",
            SurveyAction::Publish => "Publish",
            SurveyAction::Unpublish => "Unpublish",
        }
    }
}

/// Confirmation page for a survey action.
pub fn confirm(session: &Session, survey: &Survey, action: SurveyAction) -> Html<String> {
    let body = format!(
        r#"<p>{verb} the survey "{title}"?</p>
<form method="post" action="/surveys/{id}/{path}"><button type="submit">{verb}</button></form>
<p><a href="/surveys/{id}">Cancel</a></p>"#,
        verb = action.verb(),
        title = escape(&survey.title),
        id = survey.id,
        path = action.path(),
    );
    layout(&format!("{} survey", action.verb()), Some(session), &body)
}

/// Informational page with a link back.
pub fn message(session: &Session, heading: &str, text: &str, back: &str) -> Html<String> {
    let body = format!(
        r#"<p class="notice">{}</p><p><a href="{}">Back</a></p>"#,
        escape(text),
        escape(back)
    );
    layout(heading, Some(session), &body)
}

pub fn contributors(session: &Session, contributors: &Contributors) -> Html<String> {
    let mut body = String::from("<h2>Contributors</h2>");
    if contributors.contributors.is_empty() {
        body.push_str("<p>None.</p>");
    } else {
        body.push_str("<ul>");
        for c in &contributors.contributors {
            body.push_str(&format!(
                "<li>{} &lt;{}&gt;</li>",
                escape(&c.display_name),
                escape(&c.email)
            ));
        }
        body.push_str("</ul>");
    }
    body.push_str("<h2>Pending requests</h2>");
    if contributors.requests.is_empty() {
        body.push_str("<p>None.</p>");
    } else {
        body.push_str("<ul>");
        for r in &contributors.requests {
            body.push_str(&format!("<li>{}</li>", escape(&r.email_address)));
        }
        body.push_str("</ul>");
    }
    body.push_str(&format!(
        r#"<p><a href="/surveys/{id}/contributors/request">Invite a contributor</a> <a href="/surveys/{id}">Back to survey</a></p>"#,
        id = contributors.survey_id
    ));
    layout("Contributors", Some(session), &body)
}

pub fn contributor_request_form(
    session: &Session,
    survey_id: Uuid,
    email: &str,
    message: Option<&str>,
) -> Html<String> {
    let body = format!(
        r#"{}<form method="post" action="/surveys/{survey_id}/contributors/request">
<label>Email address <input type="email" name="email_address" value="{}" required></label>
<button type="submit">Invite</button>
</form>
<p><a href="/surveys/{survey_id}/contributors">Back</a></p>"#,
        notice(message),
        escape(email),
    );
    layout("Invite a contributor", Some(session), &body)
}

/// Values of the question form, one possible answer per line.
#[derive(Debug, Clone, Default)]
pub struct QuestionFormValues {
    pub text: String,
    pub question_type: Option<QuestionType>,
    pub possible_answers: String,
}

impl From<&Question> for QuestionFormValues {
    fn from(q: &Question) -> Self {
        Self {
            text: q.text.clone(),
            question_type: Some(q.question_type),
            possible_answers: q.possible_answers.join("\n"),
        }
    }
}

pub fn question_form(
    session: &Session,
    action: &str,
    values: &QuestionFormValues,
    message: Option<&str>,
    forbidden: bool,
) -> Html<String> {
    let mut options = String::new();
    for t in QuestionType::ALL {
        options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            t.as_str(),
            if values.question_type == Some(t) {
                " selected"
            } else {
                ""
            },
            t.label()
        ));
    }
    let forbidden_note = if forbidden {
        r#"<p class="forbidden">Forbidden: you are not allowed to change this survey.</p>"#
    } else {
        ""
    };
    let body = format!(
        r#"{forbidden_note}{}<form method="post" action="{}">
<label>Question <textarea name="text" required>{}</textarea></label>
<label>Type <select name="question_type">{options}</select></label>
<label>Possible answers (one per line) <textarea name="possible_answers">{}</textarea></label>
<button type="submit">Save</button>
</form>"#,
        notice(message),
        escape(action),
        escape(&values.text),
        escape(&values.possible_answers),
    );
    layout("Question", Some(session), &body)
}

pub fn question_delete_confirm(session: &Session, question: &Question) -> Html<String> {
    let body = format!(
        r#"<p>Delete the question "{}"?</p>
<form method="post" action="/questions/{id}/delete"><button type="submit">Delete</button></form>
<p><a href="/surveys/{survey_id}">Cancel</a></p>"#,
        escape(&question.text),
        id = question.id,
        survey_id = question.survey_id,
    );
    layout("Delete question", Some(session), &body)
}

pub fn access_denied(session: Option<&Session>) -> Html<String> {
    layout(
        "Access denied",
        session,
        "<p>You do not have permission to access this page.</p>",
    )
}

pub fn not_found(session: Option<&Session>) -> Html<String> {
    layout(
        "Not found",
        session,
        "<p>The page or survey you are looking for does not exist.</p>",
    )
}

pub fn error(session: Option<&Session>) -> Html<String> {
    layout(
        "Error",
        session,
        "<p>An error occurred while processing your request.</p>",
    )
}
