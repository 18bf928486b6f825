//! Error bodies of the surveys API, in the RFC 9457 problem details format.
//!
//! Every failure carries a stable `code` (`SURVEY_NOT_FOUND`, `VALIDATION_FAILED`,
//! ...). The problem `type` is derived from it as `urn:surveys:error:<code>`.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

const TYPE_PREFIX: &str = "urn:surveys:error:";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "Problem")]
#[must_use]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    /// Reason phrase of the status
    pub title: String,
    #[serde(with = "status_code")]
    #[schema(value_type = u16)]
    pub status: StatusCode,
    pub detail: String,
    /// API path of the resource the problem is about, if there is one
    #[serde(default)]
    pub instance: String,
    pub code: String,
    #[serde(default)]
    pub trace_id: Option<String>,
}

impl Problem {
    /// Problem identified by `code`, stamped with the current span as trace id.
    pub fn new(status: StatusCode, code: &str, detail: impl Into<String>) -> Self {
        Self {
            type_url: format!("{TYPE_PREFIX}{}", code.to_lowercase()),
            title: status.canonical_reason().unwrap_or("Error").to_owned(),
            status,
            detail: detail.into(),
            instance: String::new(),
            code: code.to_owned(),
            trace_id: tracing::Span::current()
                .id()
                .map(|id| id.into_u64().to_string()),
        }
    }

    /// Opaque server failure. The cause is logged where it happened.
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL",
            "An internal error occurred",
        )
    }

    pub fn about(mut self, path: impl Into<String>) -> Self {
        self.instance = path.into();
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.status;
        let mut resp = axum::Json(self).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

/// Status codes travel as plain numbers.
mod status_code {
    use axum::http::StatusCode;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(status.as_u16())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<StatusCode, D::Error> {
        let code = u16::deserialize(deserializer)?;
        StatusCode::from_u16(code).map_err(serde::de::Error::custom)
    }
}
