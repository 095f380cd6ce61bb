use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::{Patchable, PgQueryAs, Record};

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            bio: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for User {
    const NAME: &'static str = "user";
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "username",
        "email",
        "password_hash",
        "bio",
        "image_url",
        "created_at",
        "updated_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.id)
            .bind(self.username.clone())
            .bind(self.email.clone())
            .bind(self.password_hash.clone())
            .bind(self.bio.clone())
            .bind(self.image_url.clone())
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![("users_email_key", self.email.clone())]
    }
}

/// Profile fields a user may change; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
}

impl Patchable for User {
    type Patch = UserPatch;

    fn apply_patch(self, patch: UserPatch, now: OffsetDateTime) -> Self {
        Self {
            username: patch.username.unwrap_or(self.username),
            bio: patch.bio.or(self.bio),
            image_url: patch.image_url.or(self.image_url),
            updated_at: now,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        let mut user = User::new("alice".into(), "alice@x.com".into(), "hash".into());
        user.bio = Some("hello".into());
        user.image_url = Some("https://cdn/alice.png".into());
        user
    }

    #[test]
    fn empty_patch_keeps_everything_but_timestamp() {
        let before = alice();
        let later = before.updated_at + time::Duration::minutes(1);
        let after = before.clone().apply_patch(UserPatch::default(), later);
        assert_eq!(after.username, before.username);
        assert_eq!(after.bio, before.bio);
        assert_eq!(after.image_url, before.image_url);
        assert_eq!(after.password_hash, before.password_hash);
        assert_eq!(after.updated_at, later);
    }

    #[test]
    fn set_fields_replace_and_unset_fields_remain() {
        let patch = UserPatch {
            bio: Some(String::new()),
            ..Default::default()
        };
        let after = alice().apply_patch(patch, OffsetDateTime::now_utc());
        assert_eq!(after.bio.as_deref(), Some(""));
        assert_eq!(after.username, "alice");
        assert_eq!(after.image_url.as_deref(), Some("https://cdn/alice.png"));
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let json = serde_json::to_string(&alice()).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("\"hash\""));
    }
}
