//! Uniform response envelopes.
//!
//! Every handler terminates in exactly one of three shapes:
//! success `{status, data, code}`, error `{status, message, code}` or
//! validation error `{status, errors, code: 400}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use super::validation::FieldErrors;
use crate::store::ResourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    pub code: u16,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(data: T, code: StatusCode) -> Self {
        Self {
            status: Status::Success,
            data: Some(data),
            message: None,
            errors: None,
            code: code.as_u16(),
        }
    }
}

impl Envelope<()> {
    pub fn error(message: impl Into<String>, code: StatusCode) -> Self {
        Self {
            status: Status::Error,
            data: None,
            message: Some(message.into()),
            errors: None,
            code: code.as_u16(),
        }
    }

    pub fn validation(errors: FieldErrors) -> Self {
        Self {
            status: Status::Error,
            data: None,
            message: None,
            errors: Some(errors),
            code: StatusCode::BAD_REQUEST.as_u16(),
        }
    }
}

/// Successful handler result, 200 unless stated otherwise.
#[derive(Debug)]
pub struct ApiSuccess<T: Serialize>(StatusCode, T);

impl<T: Serialize> ApiSuccess<T> {
    pub fn ok(data: T) -> Self {
        Self(StatusCode::OK, data)
    }

    pub fn created(data: T) -> Self {
        Self(StatusCode::CREATED, data)
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, Json(Envelope::success(self.1, self.0))).into_response()
    }
}

/// Payload for operations that only confirm success.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Validation(FieldErrors),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    /// Error status produced by the router itself, such as 405.
    Rejected(StatusCode, String),
    Internal,
}

impl ApiError {
    /// Logs the cause and hides it from the client.
    pub fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        error!(error = %err, context, "internal error");
        ApiError::Internal
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Rejected(status, _) => *status,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Validation(_) => "Validation failed".to_string(),
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Rejected(_, msg) => msg.clone(),
            ApiError::Internal => "Internal server error".to_string(),
        }
    }
}

impl From<ResourceError> for ApiError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::Validation(errors) => ApiError::Validation(errors),
            ResourceError::NotFound(name) => ApiError::NotFound(format!("{} not found", capitalize(name))),
            ResourceError::Forbidden(msg) => ApiError::Forbidden(capitalize(msg)),
            ResourceError::Conflict(msg) => ApiError::Conflict(capitalize(msg)),
            ResourceError::Store(e) => ApiError::internal(e, "store"),
            ResourceError::Internal(e) => ApiError::internal(format!("{e:#}"), "resource"),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => Envelope::validation(errors),
            other => Envelope::error(other.message(), status),
        };
        (status, Json(body)).into_response()
    }
}
