use axum::{
    extract::State,
    routing::{delete, get, post},
    Router,
};
use tracing::instrument;

use super::{
    dto::{CommentView, CreateCommentRequest},
    services,
};
use crate::{
    api::{ApiError, ApiSuccess, IdPath, MessageData, ValidatedJson},
    auth::extractors::CurrentUser,
    state::AppState,
};

pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/comments/post/:post_id", get(comments_by_post))
        .route("/comments", post(create_comment))
        .route("/comments/:id", delete(delete_comment))
}

#[instrument(skip(state, post_id))]
pub async fn comments_by_post(
    State(state): State<AppState>,
    IdPath(post_id): IdPath,
) -> Result<ApiSuccess<Vec<CommentView>>, ApiError> {
    let comments = services::by_post(&state, post_id).await?;
    Ok(ApiSuccess::ok(comments.into_iter().map(CommentView::from).collect()))
}

#[instrument(skip_all)]
pub async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateCommentRequest>,
) -> Result<ApiSuccess<CommentView>, ApiError> {
    let comment = services::create(&state, user.id, payload).await?;
    Ok(ApiSuccess::created(comment.into()))
}

#[instrument(skip_all)]
pub async fn delete_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(id): IdPath,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    services::delete(&state, user.id, id).await?;
    Ok(ApiSuccess::ok(MessageData::new("Comment deleted successfully")))
}
