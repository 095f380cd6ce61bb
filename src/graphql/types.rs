use async_graphql::SimpleObject;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::{auth::repo_types::User, posts::repo_types::Post};

fn rfc3339(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_default()
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User")]
pub struct GqlUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    #[graphql(name = "imageURL")]
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for GqlUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id.to_string(),
            username: u.username,
            email: u.email,
            bio: u.bio,
            image_url: u.image_url,
            created_at: rfc3339(u.created_at),
            updated_at: rfc3339(u.updated_at),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Post")]
pub struct GqlPost {
    pub id: String,
    #[graphql(name = "userID")]
    pub user_id: String,
    pub caption: String,
    #[graphql(name = "imageURL")]
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Post> for GqlPost {
    fn from(p: Post) -> Self {
        Self {
            id: p.id.to_string(),
            user_id: p.user_id.to_string(),
            caption: p.caption,
            image_url: p.image_url,
            created_at: rfc3339(p.created_at),
            updated_at: rfc3339(p.updated_at),
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct AuthPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

#[derive(Debug, SimpleObject)]
pub struct RefreshPayload {
    pub access_token: String,
    pub token_type: String,
}
