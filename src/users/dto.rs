use serde::Deserialize;
use validator::Validate;

/// Profile fields read from the `PUT /users` form; absent means unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 3, max = 50, message = "must be between 3 and 50 characters"))]
    pub username: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}
