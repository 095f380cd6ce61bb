use tracing::{info, instrument};
use uuid::Uuid;

use super::{dto::CreateCommentRequest, repo::CommentStore, repo_types::Comment};
use crate::{
    api::validation::check,
    posts::repo_types::Post,
    state::AppState,
    store::{delete_owned, fetch_required, Repository, ResourceError},
};

/// Comments on a post, newest first. An unknown post simply has none.
pub async fn by_post(st: &AppState, post_id: Uuid) -> Result<Vec<Comment>, ResourceError> {
    Ok(st.comments.by_post(post_id).await?)
}

#[instrument(skip(st, req), fields(post_id = %req.post_id))]
pub async fn create(
    st: &AppState,
    user_id: Uuid,
    req: CreateCommentRequest,
) -> Result<Comment, ResourceError> {
    let req = CreateCommentRequest {
        content: req.content.trim().to_string(),
        ..req
    };
    check(&req).map_err(ResourceError::Validation)?;
    let post = fetch_required::<Post, _>(st.posts.as_ref(), req.post_id).await?;

    let comment = st
        .comments
        .create(Comment::new(post.id, user_id, req.content))
        .await?;
    info!(comment_id = %comment.id, "comment created");
    Ok(comment)
}

#[instrument(skip(st))]
pub async fn delete(st: &AppState, user_id: Uuid, id: Uuid) -> Result<(), ResourceError> {
    delete_owned::<Comment, _>(st.comments.as_ref(), id, user_id).await?;
    info!(comment_id = %id, "comment deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::fake_state;

    async fn seed_post(st: &AppState) -> Post {
        st.posts
            .create(Post::new(Uuid::new_v4(), "hello".into(), None))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_not_found() {
        let (st, fakes) = fake_state();
        let req = CreateCommentRequest {
            post_id: Uuid::new_v4(),
            content: "nice".into(),
        };
        let err = create(&st, Uuid::new_v4(), req).await.unwrap_err();
        assert!(matches!(err, ResourceError::NotFound("post")));
        assert!(fakes.comments.select(|_| true).is_empty());
    }

    #[tokio::test]
    async fn blank_comment_is_rejected() {
        let (st, fakes) = fake_state();
        let post = seed_post(&st).await;
        let req = CreateCommentRequest {
            post_id: post.id,
            content: "   \n\t ".into(),
        };
        let err = create(&st, Uuid::new_v4(), req).await.unwrap_err();
        assert!(matches!(err, ResourceError::Validation(e) if e.contains_key("content")));
        assert!(fakes.comments.select(|_| true).is_empty());
    }

    #[tokio::test]
    async fn lists_comments_for_post_only() {
        let (st, _) = fake_state();
        let post = seed_post(&st).await;
        let other = seed_post(&st).await;
        let author = Uuid::new_v4();
        for (post_id, content) in [(post.id, "first"), (post.id, "second"), (other.id, "elsewhere")] {
            create(
                &st,
                author,
                CreateCommentRequest {
                    post_id,
                    content: content.into(),
                },
            )
            .await
            .unwrap();
        }

        let comments = by_post(&st, post.id).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert!(by_post(&st, Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn only_author_may_delete() {
        let (st, _) = fake_state();
        let post = seed_post(&st).await;
        let author = Uuid::new_v4();
        let comment = create(
            &st,
            author,
            CreateCommentRequest {
                post_id: post.id,
                content: "mine".into(),
            },
        )
        .await
        .unwrap();

        let err = delete(&st, Uuid::new_v4(), comment.id).await.unwrap_err();
        assert!(matches!(err, ResourceError::Forbidden(_)));
        delete(&st, author, comment.id).await.unwrap();
        assert!(matches!(
            delete(&st, author, comment.id).await,
            Err(ResourceError::NotFound("comment"))
        ));
    }
}
