//! API error types and JSON error responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::{DatabaseError, OnboardingError, SubmissionError};
use crate::onboarding::validation::FieldErrors;

/// Errors returned by the REST handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    /// One or more fields failed validation.
    Validation {
        message: String,
        fields: FieldErrors,
    },
    DuplicateEmail(String),
    /// Malformed body, unknown option label, bad path or query value.
    BadRequest(String),
    /// The organization service did not answer in time.
    Timeout(String),
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<std::collections::BTreeMap<String, String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message, fields) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Validation { message, fields } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                Some(
                    fields
                        .into_iter()
                        .map(|(field, msg)| (field.to_string(), msg))
                        .collect(),
                ),
            ),
            ApiError::DuplicateEmail(msg) => (StatusCode::CONFLICT, "duplicate_email", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "timeout", msg, None),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None)
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
                fields,
            }),
        )
            .into_response()
    }
}

impl From<OnboardingError> for ApiError {
    fn from(err: OnboardingError) -> Self {
        let message = err.to_string();
        match err {
            OnboardingError::Validation { errors, .. } => ApiError::Validation {
                message,
                fields: errors,
            },
            OnboardingError::InvalidEmail { .. } | OnboardingError::TeamLimit { .. } => {
                let mut fields = FieldErrors::new();
                fields.insert("teamMembers", message.clone());
                ApiError::Validation { message, fields }
            }
            OnboardingError::DuplicateEmail { .. } => ApiError::DuplicateEmail(message),
            OnboardingError::TeamNotSupported => ApiError::BadRequest(message),
            OnboardingError::Submission(e) => e.into(),
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        let message = err.to_string();
        match err {
            SubmissionError::Invalid { errors, .. } => ApiError::Validation {
                message,
                fields: errors,
            },
            SubmissionError::Incomplete { missing } => ApiError::Validation {
                message,
                fields: missing
                    .into_iter()
                    .map(|field| (field, "Required".to_string()))
                    .collect(),
            },
            SubmissionError::Timeout(_) => ApiError::Timeout(message),
            SubmissionError::InFlight
            | SubmissionError::AlreadyCompleted
            | SubmissionError::Rejected(_)
            | SubmissionError::Store(_) => ApiError::Internal(message),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
