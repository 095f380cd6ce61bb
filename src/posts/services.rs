use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{NewPost, UpdatePostRequest},
    repo::PostStore,
    repo_types::{Post, PostPatch},
};
use crate::{
    api::{
        upload::UploadedFile,
        validation::{check, single},
    },
    images::services::store_post_image,
    state::AppState,
    store::{delete_owned, fetch_required, update_owned, Repository, ResourceError},
};

pub async fn list(st: &AppState) -> Result<Vec<Post>, ResourceError> {
    Ok(st.posts.fetch_all().await?)
}

pub async fn get(st: &AppState, id: Uuid) -> Result<Post, ResourceError> {
    fetch_required::<Post, _>(st.posts.as_ref(), id).await
}

pub async fn by_user(st: &AppState, user_id: Uuid) -> Result<Vec<Post>, ResourceError> {
    Ok(st.posts.by_user(user_id).await?)
}

pub async fn search(st: &AppState, query: &str) -> Result<Vec<Post>, ResourceError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ResourceError::Validation(single("query", "is required")));
    }
    Ok(st.posts.search(query).await?)
}

#[instrument(skip(st, image))]
pub async fn create(
    st: &AppState,
    user_id: Uuid,
    caption: Option<String>,
    image: Option<UploadedFile>,
) -> Result<Post, ResourceError> {
    let new = NewPost {
        caption: caption.unwrap_or_default().trim().to_string(),
    };
    check(&new).map_err(|errors| {
        warn!(?errors, "invalid post");
        ResourceError::Validation(errors)
    })?;

    let image_url = match image {
        Some(file) => Some(store_post_image(st.storage.as_ref(), user_id, file).await?),
        None => None,
    };
    let post = st.posts.create(Post::new(user_id, new.caption, image_url)).await?;
    info!(post_id = %post.id, "post created");
    Ok(post)
}

#[instrument(skip(st, req))]
pub async fn update_caption(
    st: &AppState,
    user_id: Uuid,
    id: Uuid,
    req: UpdatePostRequest,
) -> Result<Post, ResourceError> {
    let req = UpdatePostRequest {
        caption: req.caption.trim().to_string(),
    };
    check(&req).map_err(ResourceError::Validation)?;
    let patch = PostPatch {
        caption: Some(req.caption),
        ..Default::default()
    };
    let post = update_owned::<Post, _>(st.posts.as_ref(), id, user_id, patch).await?;
    info!(post_id = %post.id, "post updated");
    Ok(post)
}

#[instrument(skip(st))]
pub async fn delete(st: &AppState, user_id: Uuid, id: Uuid) -> Result<(), ResourceError> {
    delete_owned::<Post, _>(st.posts.as_ref(), id, user_id).await?;
    info!(post_id = %id, "post deleted");
    Ok(())
}
