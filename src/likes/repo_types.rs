use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::{PgQueryAs, Record};

/// One user liking one post; the pair is unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Like {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
}

impl Like {
    pub fn new(user_id: Uuid, post_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

impl Record for Like {
    const NAME: &'static str = "like";
    const TABLE: &'static str = "likes";
    const COLUMNS: &'static [&'static str] = &["id", "post_id", "user_id", "created_at"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.user_id
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.id)
            .bind(self.post_id)
            .bind(self.user_id)
            .bind(self.created_at)
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![(
            "likes_user_id_post_id_key",
            format!("{}:{}", self.user_id, self.post_id),
        )]
    }
}
