use thiserror::Error;

use super::{jwt::TokenError, password::PasswordError};
use crate::{
    api::{validation::FieldErrors, ApiError},
    store::StoreError,
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed")]
    Validation(FieldErrors),

    #[error("email already registered")]
    DuplicateEmail,

    /// Same error for unknown email and wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(TokenError),

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("missing or invalid token")]
    MissingOrInvalidToken,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(errors) => ApiError::Validation(errors),
            AuthError::DuplicateEmail => ApiError::Conflict("Email already registered".into()),
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".into())
            }
            AuthError::InvalidToken(TokenError::Expired) => {
                ApiError::Unauthorized("Refresh token has expired, please log in again".into())
            }
            AuthError::InvalidToken(_) => ApiError::Unauthorized("Invalid refresh token".into()),
            AuthError::Unauthorized(reason) => ApiError::Unauthorized(format!("Unauthorized: {reason}")),
            AuthError::MissingOrInvalidToken => {
                ApiError::Unauthorized("Missing or invalid token".into())
            }
            AuthError::Internal(msg) => ApiError::internal(msg, "auth"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn maps_domain_errors_to_statuses() {
        let cases = [
            (AuthError::DuplicateEmail, StatusCode::CONFLICT),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidToken(TokenError::Expired), StatusCode::UNAUTHORIZED),
            (AuthError::Unauthorized("user not found"), StatusCode::UNAUTHORIZED),
            (AuthError::MissingOrInvalidToken, StatusCode::UNAUTHORIZED),
            (AuthError::Internal("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let api = ApiError::from(AuthError::Internal("password=hunter2".into()));
        assert!(!api.message().contains("hunter2"));
    }
}
