use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use super::{
    response::ApiError,
    validation::{check, single},
};
use crate::auth::errors::AuthError;

/// JSON body that has already passed its declared field constraints.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                warn!(error = %rejection.body_text(), "rejected request body");
                ApiError::Validation(single("body", "invalid request format"))
            })?;
        check(&value).map_err(|errors| {
            warn!(fields = ?errors.keys().collect::<Vec<_>>(), "validation failed");
            ApiError::Validation(errors)
        })?;
        Ok(Self(value))
    }
}

/// Single UUID path segment such as `/posts/:id`.
pub struct IdPath(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                warn!(error = %rejection.body_text(), "rejected path parameter");
                ApiError::BadRequest("Invalid identifier".into())
            })?;
        Ok(Self(id))
    }
}

/// Reads `Authorization: Bearer <token>`; anything else is rejected.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingOrInvalidToken)
}
