use async_graphql::{Context, MergedObject, Object, Result as GraphQLResult};

use super::{
    current_user,
    errors::{parse_id, GqlResultExt},
    types::{GqlPost, GqlUser},
};
use crate::{posts, state::AppState, users};

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    async fn get_all_users(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<GqlUser>> {
        let st = ctx.data::<AppState>()?;
        let users = users::services::list(st).await.gql()?;
        Ok(users.into_iter().map(GqlUser::from).collect())
    }

    #[graphql(name = "getUserByID")]
    async fn get_user_by_id(&self, ctx: &Context<'_>, id: String) -> GraphQLResult<GqlUser> {
        let st = ctx.data::<AppState>()?;
        let user = users::services::get(st, parse_id(&id)?).await.gql()?;
        Ok(user.into())
    }

    async fn search_users(&self, ctx: &Context<'_>, query: String) -> GraphQLResult<Vec<GqlUser>> {
        let st = ctx.data::<AppState>()?;
        let users = users::services::search(st, &query).await.gql()?;
        Ok(users.into_iter().map(GqlUser::from).collect())
    }

    async fn current_user(&self, ctx: &Context<'_>) -> GraphQLResult<GqlUser> {
        Ok(current_user(ctx).await?.into())
    }
}

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    async fn get_all_posts(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<GqlPost>> {
        let st = ctx.data::<AppState>()?;
        let posts = posts::services::list(st).await.gql()?;
        Ok(posts.into_iter().map(GqlPost::from).collect())
    }

    #[graphql(name = "getPostByID")]
    async fn get_post_by_id(&self, ctx: &Context<'_>, id: String) -> GraphQLResult<GqlPost> {
        let st = ctx.data::<AppState>()?;
        let post = posts::services::get(st, parse_id(&id)?).await.gql()?;
        Ok(post.into())
    }

    #[graphql(name = "getPostsByUserID")]
    async fn get_posts_by_user_id(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "userID")] user_id: String,
    ) -> GraphQLResult<Vec<GqlPost>> {
        let st = ctx.data::<AppState>()?;
        let posts = posts::services::by_user(st, parse_id(&user_id)?).await.gql()?;
        Ok(posts.into_iter().map(GqlPost::from).collect())
    }
}

#[derive(MergedObject, Default)]
pub struct QueryRoot(UserQuery, PostQuery);
