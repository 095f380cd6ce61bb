use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Query, State},
    routing::{get, post, put},
    Router,
};
use tracing::instrument;

use super::{
    dto::{PostView, UpdatePostRequest},
    services,
};
use crate::{
    api::{upload::read_form, ApiError, ApiSuccess, IdPath, MessageData, ValidatedJson},
    auth::extractors::CurrentUser,
    state::AppState,
    users::dto::SearchQuery,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/:id", get(get_post))
        .route("/posts/user/:user_id", get(posts_by_user))
        .route("/search/posts", get(search_posts))
}

pub fn write_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/posts",
            post(create_post).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/posts/:id", put(update_post).delete(delete_post))
}

fn views(posts: Vec<super::repo_types::Post>) -> Vec<PostView> {
    posts.into_iter().map(PostView::from).collect()
}

#[instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> Result<ApiSuccess<Vec<PostView>>, ApiError> {
    Ok(ApiSuccess::ok(views(services::list(&state).await?)))
}

#[instrument(skip(state, id))]
pub async fn get_post(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<ApiSuccess<PostView>, ApiError> {
    Ok(ApiSuccess::ok(services::get(&state, id).await?.into()))
}

#[instrument(skip(state, user_id))]
pub async fn posts_by_user(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
) -> Result<ApiSuccess<Vec<PostView>>, ApiError> {
    Ok(ApiSuccess::ok(views(services::by_user(&state, user_id).await?)))
}

#[instrument(skip(state, q))]
pub async fn search_posts(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<ApiSuccess<Vec<PostView>>, ApiError> {
    Ok(ApiSuccess::ok(views(services::search(&state, &q.query).await?)))
}

/// POST /posts (multipart): `caption` text plus optional `image` file.
#[instrument(skip_all)]
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiSuccess<PostView>, ApiError> {
    let form = read_form(multipart, "image").await?;
    let caption = form.text("caption");
    let post = services::create(&state, user.id, caption, form.file).await?;
    Ok(ApiSuccess::created(post.into()))
}

#[instrument(skip_all)]
pub async fn update_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<UpdatePostRequest>,
) -> Result<ApiSuccess<PostView>, ApiError> {
    let post = services::update_caption(&state, user.id, id, payload).await?;
    Ok(ApiSuccess::ok(post.into()))
}

#[instrument(skip_all)]
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(id): IdPath,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    services::delete(&state, user.id, id).await?;
    Ok(ApiSuccess::ok(MessageData::new("Post deleted successfully")))
}
