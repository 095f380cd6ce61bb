use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{repo::LikeStore, repo_types::Like};
use crate::{
    posts::repo_types::Post,
    state::AppState,
    store::{fetch_required, Record, Repository, ResourceError, StoreError},
};

pub async fn by_post(st: &AppState, post_id: Uuid) -> Result<Vec<Like>, ResourceError> {
    Ok(st.likes.by_post(post_id).await?)
}

pub async fn by_user(st: &AppState, user_id: Uuid) -> Result<Vec<Like>, ResourceError> {
    Ok(st.likes.by_user(user_id).await?)
}

#[instrument(skip(st))]
pub async fn add(st: &AppState, user_id: Uuid, post_id: Uuid) -> Result<Like, ResourceError> {
    fetch_required::<Post, _>(st.posts.as_ref(), post_id).await?;

    if st.likes.find_pair(user_id, post_id).await?.is_some() {
        warn!("post already liked");
        return Err(ResourceError::Conflict("post already liked"));
    }
    let like = match st.likes.create(Like::new(user_id, post_id)).await {
        Ok(like) => like,
        Err(StoreError::Conflict(_)) => return Err(ResourceError::Conflict("post already liked")),
        Err(e) => return Err(e.into()),
    };
    info!(like_id = %like.id, "post liked");
    Ok(like)
}

#[instrument(skip(st))]
pub async fn remove(st: &AppState, user_id: Uuid, post_id: Uuid) -> Result<(), ResourceError> {
    let like = st
        .likes
        .find_pair(user_id, post_id)
        .await?
        .ok_or(ResourceError::NotFound(Like::NAME))?;
    if !st.likes.delete(like.id).await? {
        return Err(ResourceError::NotFound(Like::NAME));
    }
    info!("post unliked");
    Ok(())
}
