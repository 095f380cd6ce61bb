use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::{PgQueryAs, Record};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Comment {
    pub fn new(post_id: Uuid, user_id: Uuid, content: String) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Comment {
    const NAME: &'static str = "comment";
    const TABLE: &'static str = "comments";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "post_id",
        "user_id",
        "content",
        "created_at",
        "updated_at",
    ];

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
            .bind(self.content.clone())
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}
