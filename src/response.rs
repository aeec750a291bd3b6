//! JSON error body sent back for declined requests.
//!
//! The body follows the TMF error response layout:
//!
//! ```json
//! {
//!   "id": "2f1c...",
//!   "code": "NC-COMMON-2101",
//!   "reason": "Request is declined with 404 Not Found, because deprecated REST API is disabled",
//!   "message": "Request [GET] '/deprecated-api/v1/test' is declined with 404 Not Found, ...",
//!   "status": "404",
//!   "@type": "NC.TMFErrorResponse.v1.0"
//! }
//! ```

use crate::error::DeprecatedApiError;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// `@type` of every error body.
pub const TMF_ERROR_TYPE: &str = "NC.TMFErrorResponse.v1.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub id: String,
    pub code: String,
    pub reason: String,
    pub message: String,
    pub status: String,
    #[serde(rename = "@type")]
    pub kind: String,
}

impl ErrorResponse {
    pub fn from_error(err: &DeprecatedApiError) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code: err.code().to_string(),
            reason: err.reason().to_string(),
            message: err.to_string(),
            status: err.status().to_string(),
            kind: TMF_ERROR_TYPE.to_string(),
        }
    }
}

impl IntoResponse for DeprecatedApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status()).unwrap_or(StatusCode::NOT_FOUND);
        let body = ErrorResponse::from_error(&self);
        (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(body),
        )
            .into_response()
    }
}
