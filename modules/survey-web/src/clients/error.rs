use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a call to the surveys API, classified for the controllers.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("access denied")]
    Forbidden,

    #[error("resource not found")]
    NotFound,

    #[error("conflict: {message}")]
    Conflict { message: String },

    /// The API rejected the submitted values.
    #[error("invalid input: {message}")]
    Invalid { message: String },

    /// The API rejected the access token; the session must be dropped.
    #[error("access token rejected")]
    Unauthorized,

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ServiceError {
    /// Classify a non-success API status. `detail` is the problem detail, if any.
    pub fn from_status(status: StatusCode, detail: Option<String>) -> Self {
        match status {
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::CONFLICT => Self::Conflict {
                message: detail.unwrap_or_else(|| "conflict".to_owned()),
            },
            StatusCode::UNPROCESSABLE_ENTITY => Self::Invalid {
                message: detail.unwrap_or_else(|| "invalid input".to_owned()),
            },
            other => Self::Unexpected(match detail {
                Some(detail) => format!("{other}: {detail}"),
                None => other.to_string(),
            }),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        Self::Unexpected(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_distinct_errors() {
        assert!(matches!(
            ServiceError::from_status(StatusCode::FORBIDDEN, None),
            ServiceError::Forbidden
        ));
        assert!(matches!(
            ServiceError::from_status(StatusCode::NOT_FOUND, None),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from_status(StatusCode::UNAUTHORIZED, None),
            ServiceError::Unauthorized
        ));
        assert!(matches!(
            ServiceError::from_status(StatusCode::CONFLICT, Some("taken".to_owned())),
            ServiceError::Conflict { message } if message == "taken"
        ));
        assert!(matches!(
            ServiceError::from_status(StatusCode::UNPROCESSABLE_ENTITY, Some("too long".to_owned())),
            ServiceError::Invalid { message } if message == "too long"
        ));
        assert!(matches!(
            ServiceError::from_status(StatusCode::BAD_GATEWAY, None),
            ServiceError::Unexpected(_)
        ));
    }
}
