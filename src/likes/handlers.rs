use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use tracing::instrument;

use super::{dto::LikeView, services};
use crate::{
    api::{ApiError, ApiSuccess, IdPath, MessageData},
    auth::extractors::CurrentUser,
    state::AppState,
};

pub fn like_routes() -> Router<AppState> {
    Router::new()
        .route("/likes/post/:post_id", get(likes_by_post))
        .route("/likes/user/:user_id", get(likes_by_user))
        .route("/likes/:post_id", post(like_post).delete(unlike_post))
}

#[instrument(skip(state, post_id))]
pub async fn likes_by_post(
    State(state): State<AppState>,
    IdPath(post_id): IdPath,
) -> Result<ApiSuccess<Vec<LikeView>>, ApiError> {
    let likes = services::by_post(&state, post_id).await?;
    Ok(ApiSuccess::ok(likes.into_iter().map(LikeView::from).collect()))
}

#[instrument(skip(state, user_id))]
pub async fn likes_by_user(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
) -> Result<ApiSuccess<Vec<LikeView>>, ApiError> {
    let likes = services::by_user(&state, user_id).await?;
    Ok(ApiSuccess::ok(likes.into_iter().map(LikeView::from).collect()))
}

#[instrument(skip_all)]
pub async fn like_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(post_id): IdPath,
) -> Result<ApiSuccess<LikeView>, ApiError> {
    let like = services::add(&state, user.id, post_id).await?;
    Ok(ApiSuccess::created(like.into()))
}

#[instrument(skip_all)]
pub async fn unlike_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(post_id): IdPath,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    services::remove(&state, user.id, post_id).await?;
    Ok(ApiSuccess::ok(MessageData::new("Like removed successfully")))
}
