use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use super::repo_types::User;

/// Request body for user registration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub old_password: String,
    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    pub new_password: String,
}

/// Token pair returned after login.
#[derive(Debug, Serialize)]
pub struct LoginData {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RefreshData {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            bio: user.bio,
            image_url: user.image_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::validation::check;

    #[test]
    fn public_user_serialization() {
        let user = User::new("alice".into(), "alice@x.com".into(), "secret-hash".into());
        let json = serde_json::to_value(PublicUser::from(user)).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["email"], "alice@x.com");
        assert!(json.get("password_hash").is_none());
        assert!(json["created_at"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn register_request_collects_all_errors() {
        let errors = check(&RegisterRequest {
            username: "al".into(),
            email: "nope".into(),
            password: "123".into(),
        })
        .unwrap_err();
        assert_eq!(
            errors.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["email", "password", "username"]
        );
    }

    #[test]
    fn change_password_requires_strong_new_password() {
        let errors = check(&ChangePasswordRequest {
            old_password: "secret123".into(),
            new_password: "short".into(),
        })
        .unwrap_err();
        assert!(errors.contains_key("new_password"));
        assert!(!errors.contains_key("old_password"));
    }
}
