use axum::{
    extract::State,
    routing::{get, post, put},
    Router,
};
use tracing::instrument;

use super::{
    dto::{
        ChangePasswordRequest, LoginData, LoginRequest, PublicUser, RefreshData, RefreshRequest,
        RegisterRequest,
    },
    extractors::CurrentUser,
};
use crate::{
    api::{ApiError, ApiSuccess, MessageData, ValidatedJson},
    state::AppState,
};

pub const TOKEN_TYPE: &str = "Bearer";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh-token", post(refresh_token))
        .route("/auth/current-user", get(current_user))
        .route("/auth/change-password", put(change_password))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state.auth.register(payload).await?;
    Ok(ApiSuccess::created(MessageData::new("User registered successfully")))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<ApiSuccess<LoginData>, ApiError> {
    let pair = state.auth.login(payload).await?;
    Ok(ApiSuccess::ok(LoginData {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: TOKEN_TYPE,
    }))
}

#[instrument(skip_all)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> Result<ApiSuccess<RefreshData>, ApiError> {
    let access_token = state.auth.refresh_token(&payload.refresh_token).await?;
    Ok(ApiSuccess::ok(RefreshData {
        access_token,
        token_type: TOKEN_TYPE,
    }))
}

#[instrument(skip_all)]
pub async fn current_user(CurrentUser(user): CurrentUser) -> ApiSuccess<PublicUser> {
    ApiSuccess::ok(PublicUser::from(user))
}

#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state.auth.change_password(user.id, payload).await?;
    Ok(ApiSuccess::ok(MessageData::new("Password changed successfully")))
}
