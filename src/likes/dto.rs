use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Like;

#[derive(Debug, Clone, Serialize)]
pub struct LikeView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Like> for LikeView {
    fn from(l: Like) -> Self {
        Self {
            id: l.id,
            post_id: l.post_id,
            user_id: l.user_id,
            created_at: l.created_at,
        }
    }
}
