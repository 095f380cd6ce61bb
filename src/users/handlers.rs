use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Query, State},
    routing::get,
    Router,
};
use tracing::instrument;

use super::{
    dto::{ProfileUpdate, SearchQuery},
    services,
};
use crate::{
    api::{upload::read_form, ApiError, ApiSuccess, IdPath},
    auth::{dto::PublicUser, extractors::CurrentUser, repo_types::User},
    state::AppState,
};

pub fn user_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(list_users)
                .put(update_profile)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/users/:id", get(get_user))
        .route("/search/users", get(search_users))
}

fn public(users: Vec<User>) -> Vec<PublicUser> {
    users.into_iter().map(PublicUser::from).collect()
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<ApiSuccess<Vec<PublicUser>>, ApiError> {
    Ok(ApiSuccess::ok(public(services::list(&state).await?)))
}

#[instrument(skip(state, id))]
pub async fn get_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<ApiSuccess<PublicUser>, ApiError> {
    Ok(ApiSuccess::ok(services::get(&state, id).await?.into()))
}

#[instrument(skip(state, q))]
pub async fn search_users(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<ApiSuccess<Vec<PublicUser>>, ApiError> {
    Ok(ApiSuccess::ok(public(services::search(&state, &q.query).await?)))
}

/// PUT /users (multipart): optional `username`, `bio` and `image`.
#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiSuccess<PublicUser>, ApiError> {
    let form = read_form(multipart, "image").await?;
    let update = ProfileUpdate {
        username: form.text("username"),
        bio: form.text("bio"),
    };
    let user = services::update_profile(&state, user.id, update, form.file).await?;
    Ok(ApiSuccess::ok(user.into()))
}
