//! Maps DomainError onto HTTP responses. Every error body is `{"error": "<message>"}`.

use crate::domain::{DomainError, IdentityError};
use axum::{
    Json,
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Generic message for metadata-source failures.
pub const UPSTREAM_FAILURE: &str = "Failed to query OMDb.";

const INTERNAL_FAILURE: &str = "Internal server error.";

/// Where unauthenticated clients are sent.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError(DomainError::Validation(e.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError(DomainError::Validation(e.body_text()))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        ApiError(DomainError::Validation(e.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::MissingParameter(_) | DomainError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            DomainError::Identity(e) => match e {
                IdentityError::InvalidEmail => StatusCode::BAD_REQUEST,
                IdentityError::EmailInUse => StatusCode::CONFLICT,
                IdentityError::EmailNotVerified => StatusCode::FORBIDDEN,
                IdentityError::UserNotFound
                | IdentityError::WrongPassword
                | IdentityError::Other(_) => StatusCode::UNAUTHORIZED,
            },
            DomainError::Upstream(_) | DomainError::Repo(_) | DomainError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self.0 {
            DomainError::Upstream(cause) => {
                error!(cause = %cause, "metadata lookup failed");
                json!({ "error": UPSTREAM_FAILURE })
            }
            DomainError::Repo(cause) | DomainError::Storage(cause) => {
                error!(cause = %cause, "internal failure");
                json!({ "error": INTERNAL_FAILURE })
            }
            DomainError::Unauthorized { return_url } => json!({
                "error": self.0.to_string(),
                "redirect": LOGIN_PATH,
                "return_url": return_url,
            }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
