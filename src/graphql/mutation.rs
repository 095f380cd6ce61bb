use async_graphql::{Context, MergedObject, Object, Result as GraphQLResult};

use super::{
    current_user,
    errors::{parse_id, GqlResultExt},
    types::{AuthPayload, GqlPost, GqlUser, RefreshPayload},
};
use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        handlers::TOKEN_TYPE,
    },
    posts::{self, dto::UpdatePostRequest},
    state::AppState,
    users::{self, dto::ProfileUpdate},
};

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    async fn register(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
        password: String,
    ) -> GraphQLResult<GqlUser> {
        let st = ctx.data::<AppState>()?;
        let user = st
            .auth
            .register(RegisterRequest {
                username,
                email,
                password,
            })
            .await
            .gql()?;
        Ok(user.into())
    }

    async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> GraphQLResult<AuthPayload> {
        let st = ctx.data::<AppState>()?;
        let pair = st.auth.login(LoginRequest { email, password }).await.gql()?;
        Ok(AuthPayload {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: TOKEN_TYPE.to_string(),
        })
    }

    async fn refresh_token(
        &self,
        ctx: &Context<'_>,
        refresh_token: String,
    ) -> GraphQLResult<RefreshPayload> {
        let st = ctx.data::<AppState>()?;
        let access_token = st.auth.refresh_token(&refresh_token).await.gql()?;
        Ok(RefreshPayload {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
        })
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn update_user(
        &self,
        ctx: &Context<'_>,
        username: Option<String>,
        bio: Option<String>,
    ) -> GraphQLResult<GqlUser> {
        let st = ctx.data::<AppState>()?;
        let me = current_user(ctx).await?;
        let user = users::services::update_profile(st, me.id, ProfileUpdate { username, bio }, None)
            .await
            .gql()?;
        Ok(user.into())
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    async fn create_post(&self, ctx: &Context<'_>, caption: String) -> GraphQLResult<GqlPost> {
        let st = ctx.data::<AppState>()?;
        let me = current_user(ctx).await?;
        let post = posts::services::create(st, me.id, Some(caption), None).await.gql()?;
        Ok(post.into())
    }

    async fn update_post_caption(
        &self,
        ctx: &Context<'_>,
        id: String,
        caption: String,
    ) -> GraphQLResult<GqlPost> {
        let st = ctx.data::<AppState>()?;
        let me = current_user(ctx).await?;
        let post = posts::services::update_caption(st, me.id, parse_id(&id)?, UpdatePostRequest { caption })
            .await
            .gql()?;
        Ok(post.into())
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: String) -> GraphQLResult<String> {
        let st = ctx.data::<AppState>()?;
        let me = current_user(ctx).await?;
        posts::services::delete(st, me.id, parse_id(&id)?).await.gql()?;
        Ok("Post deleted successfully".to_string())
    }
}

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutation, UserMutation, PostMutation);
