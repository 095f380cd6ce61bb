use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::Post;
use crate::store::{
    postgres::{contains_pattern, map_sqlx, select_sql},
    PgRepository, Repository, StoreError,
};

#[async_trait]
pub trait PostStore: Repository<Post> {
    async fn by_user(&self, user_id: Uuid) -> Result<Vec<Post>, StoreError>;

    /// Case-insensitive caption match.
    async fn search(&self, query: &str) -> Result<Vec<Post>, StoreError>;
}

#[async_trait]
impl PostStore for PgRepository<Post> {
    async fn by_user(&self, user_id: Uuid) -> Result<Vec<Post>, StoreError> {
        let sql = select_sql::<Post>("WHERE user_id = $1");
        sqlx::query_as::<_, Post>(&sql)
            .bind(user_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx)
    }

    async fn search(&self, query: &str) -> Result<Vec<Post>, StoreError> {
        let sql = select_sql::<Post>("WHERE caption ILIKE $1 ESCAPE '\\'");
        sqlx::query_as::<_, Post>(&sql)
            .bind(contains_pattern(query))
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
    impl PostStore for MemoryRepository<Post> {
        async fn by_user(&self, user_id: Uuid) -> Result<Vec<Post>, StoreError> {
            Ok(self.select(|p| p.user_id == user_id))
        }

        async fn search(&self, query: &str) -> Result<Vec<Post>, StoreError> {
            let needle = query.to_lowercase();
            Ok(self.select(|p| p.caption.to_lowercase().contains(&needle)))
        }
    }
}
