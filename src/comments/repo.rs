use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::Comment;
use crate::store::{
    postgres::{map_sqlx, select_sql},
    PgRepository, Repository, StoreError,
};

#[async_trait]
pub trait CommentStore: Repository<Comment> {
    async fn by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, StoreError>;
}

#[async_trait]
impl CommentStore for PgRepository<Comment> {
    async fn by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        let sql = select_sql::<Comment>("WHERE post_id = $1");
        sqlx::query_as::<_, Comment>(&sql)
            .bind(post_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx)
    }
}

#[cfg(test)]
mod memory {
    use super::*;
    use crate::store::memory::MemoryRepository;

    #[async_trait]
    impl CommentStore for MemoryRepository<Comment> {
        async fn by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, StoreError> {
            Ok(self.select(|c| c.post_id == post_id))
        }
    }
}
