use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::Like;
use crate::store::{
    postgres::{map_sqlx, select_sql},
    PgRepository, Repository, StoreError,
};

#[async_trait]
pub trait LikeStore: Repository<Like> {
    async fn by_post(&self, post_id: Uuid) -> Result<Vec<Like>, StoreError>;
    async fn by_user(&self, user_id: Uuid) -> Result<Vec<Like>, StoreError>;
    async fn find_pair(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<Like>, StoreError>;
}

#[async_trait]
impl LikeStore for PgRepository<Like> {
    async fn by_post(&self, post_id: Uuid) -> Result<Vec<Like>, StoreError> {
        let sql = select_sql::<Like>("WHERE post_id = $1");
        sqlx::query_as::<_, Like>(&sql)
            .bind(post_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx)
    }

    async fn by_user(&self, user_id: Uuid) -> Result<Vec<Like>, StoreError> {
        let sql = select_sql::<Like>("WHERE user_id = $1");
        sqlx::query_as::<_, Like>(&sql)
            .bind(user_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx)
    }

    async fn find_pair(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<Like>, StoreError> {
        let sql = select_sql::<Like>("WHERE user_id = $1 AND post_id = $2");
        sqlx::query_as::<_, Like>(&sql)
            .bind(user_id)
            .bind(post_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx)
    }
}
