use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::repo_types::User;
use crate::{
    api::{extractors::bearer_token, ApiError},
    state::AppState,
};

/// The user behind the request's bearer token.
///
/// The header is checked before any lookup, so a missing or malformed
/// `Authorization` header never reaches the user store.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let user = state.auth.current_user(token).await?;
        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::tests::fake_state, store::Repository};
    use axum::http::{header::AUTHORIZATION, Request, StatusCode};

    async fn extract(state: &AppState, auth: Option<&str>) -> Result<CurrentUser, ApiError> {
        let mut builder = Request::builder().uri("/auth/current-user");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        CurrentUser::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn missing_header_fails_before_store_access() {
        let (state, fakes) = fake_state();
        for header in [None, Some("Basic abc"), Some("Bearer ")] {
            let err = extract(&state, header).await.err().expect("rejected");
            assert_eq!(err, ApiError::Unauthorized("Missing or invalid token".into()));
        }
        assert_eq!(fakes.users.calls(), 0);
    }

    #[tokio::test]
    async fn valid_token_resolves_user() {
        let (state, fakes) = fake_state();
        let user = User::new("alice".into(), "alice@x.com".into(), "hash".into());
        fakes.users.create(user.clone()).await.unwrap();
        let token = state.auth.tokens().issue_access_token(user.id).unwrap();

        let CurrentUser(found) = extract(&state, Some(&format!("Bearer {token}")))
            .await
            .ok()
            .expect("authorized");
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let (state, _) = fake_state();
        let err = extract(&state, Some("Bearer not.a.token")).await.err().unwrap();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
