use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use super::repo_types::Post;

/// Caption edit; images are only set at creation time.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 2200, message = "must be between 1 and 2200 characters"))]
    pub caption: String,
}

/// Multipart text fields of a new post, checked after the form is drained.
#[derive(Debug, Validate)]
pub struct NewPost {
    #[validate(length(min = 1, max = 2200, message = "must be between 1 and 2200 characters"))]
    pub caption: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PostView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub caption: String,
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Post> for PostView {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            caption: p.caption,
            image_url: p.image_url,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
