use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::{Patchable, PgQueryAs, Record};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub caption: String,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Post {
    pub fn new(user_id: Uuid, caption: String, image_url: Option<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            user_id,
            caption,
            image_url,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Post {
    const NAME: &'static str = "post";
    const TABLE: &'static str = "posts";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "caption",
        "image_url",
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
            .bind(self.user_id)
            .bind(self.caption.clone())
            .bind(self.image_url.clone())
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub caption: Option<String>,
    pub image_url: Option<String>,
}

impl Patchable for Post {
    type Patch = PostPatch;

    fn apply_patch(self, patch: PostPatch, now: OffsetDateTime) -> Self {
        Self {
            caption: patch.caption.unwrap_or(self.caption),
            image_url: patch.image_url.or(self.image_url),
            updated_at: now,
            ..self
        }
    }
}
