//! HTTP handlers; each delegates to its resource submodule's service.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::api::rest::problem::Problem;

pub mod contributors;
pub mod questions;
pub mod surveys;
pub mod tenants;
pub mod users;

pub type ApiResult<T> = Result<T, Problem>;

/// 201 with a `Location` header and JSON body.
pub(crate) fn created_json<T: Serialize>(location: &str, body: T) -> Response {
    let mut resp = (StatusCode::CREATED, Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(location) {
        resp.headers_mut().insert(header::LOCATION, value);
    }
    resp
}
