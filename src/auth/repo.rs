use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::store::{
    postgres::{contains_pattern, map_sqlx, select_sql},
    PgRepository, Repository, StoreError,
};

/// User lookups beyond plain fetch-by-id.
#[async_trait]
pub trait UserStore: Repository<User> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Case-insensitive match on username or email.
    async fn search(&self, query: &str) -> Result<Vec<User>, StoreError>;

    /// Writes only the password columns. Returns whether the user exists.
    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
        now: OffsetDateTime,
    ) -> Result<bool, StoreError>;
}

#[async_trait]
impl UserStore for PgRepository<User> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = select_sql::<User>("WHERE email = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx)
    }

    async fn search(&self, query: &str) -> Result<Vec<User>, StoreError> {
        let sql = select_sql::<User>(
            "WHERE username ILIKE $1 ESCAPE '\\' OR email ILIKE $1 ESCAPE '\\'",
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(contains_pattern(query))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx)
    }

    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
        now: OffsetDateTime,
    ) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .bind(now)
                .execute(self.pool())
                .await
                .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod memory {
    use super::*;
    use crate::store::memory::MemoryRepository;

    #[async_trait]
    impl UserStore for MemoryRepository<User> {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
            Ok(self.select(|u| u.email == email).into_iter().next())
        }

        async fn search(&self, query: &str) -> Result<Vec<User>, StoreError> {
            let needle = query.to_lowercase();
            Ok(self.select(|u| {
                u.username.to_lowercase().contains(&needle) || u.email.to_lowercase().contains(&needle)
            }))
        }

        async fn set_password_hash(
            &self,
            id: Uuid,
            password_hash: &str,
            now: OffsetDateTime,
        ) -> Result<bool, StoreError> {
            let password_hash = password_hash.to_string();
            let change = Box::new(move |user: User| User {
                password_hash,
                updated_at: now,
                ..user
            });
            match self.update(id, change).await {
                Ok(_) => Ok(true),
                Err(StoreError::NotFound) => Ok(false),
                Err(e) => Err(e),
            }
        }
    }
}
