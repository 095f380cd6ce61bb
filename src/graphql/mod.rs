//! GraphQL translation layer over the same services the REST routes use.

pub mod errors;
pub mod mutation;
pub mod query;
pub mod types;

use async_graphql::{
    http::GraphiQLSource, Context, EmptySubscription, Request, Response, Result as GraphQLResult,
    Schema,
};
use axum::{
    extract::Extension,
    http::HeaderMap,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    api::extractors::bearer_token,
    auth::{errors::AuthError, repo_types::User},
    state::AppState,
};
use errors::GqlResultExt;
use mutation::MutationRoot;
use query::QueryRoot;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Bearer token of the current GraphQL request, if one was sent.
pub struct RequestToken(pub String);

pub fn build_schema(state: AppState) -> AppSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(state)
        .finish()
}

pub fn router(schema: AppSchema) -> Router<AppState> {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(Extension(schema))
}

/// Resolves the caller through the auth service, as the REST extractor does.
pub(crate) async fn current_user(ctx: &Context<'_>) -> GraphQLResult<User> {
    let st = ctx.data::<AppState>()?;
    let token = ctx
        .data_opt::<RequestToken>()
        .ok_or(AuthError::MissingOrInvalidToken)
        .gql()?;
    st.auth.current_user(&token.0).await.gql()
}

#[instrument(skip_all)]
pub async fn graphql_handler(
    Extension(schema): Extension<AppSchema>,
    headers: HeaderMap,
    Json(req): Json<Request>,
) -> Json<Response> {
    let mut req = req;
    if let Ok(token) = bearer_token(&headers) {
        req = req.data(RequestToken(token.to_string()));
    }
    Json(schema.execute(req).await)
}

pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/api/v1/graphql").finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::tests::fake_state, store::Repository};
    use serde_json::{json, Value};

    async fn run(schema: &AppSchema, query: &str, token: Option<&str>) -> Value {
        let mut req = Request::new(query);
        if let Some(t) = token {
            req = req.data(RequestToken(t.to_string()));
        }
        serde_json::to_value(schema.execute(req).await).unwrap()
    }

    #[tokio::test]
    async fn register_login_and_current_user() {
        let (state, _) = fake_state();
        let schema = build_schema(state);

        let registered = run(
            &schema,
            r#"mutation { register(username: "alice", email: "alice@x.com", password: "secret123") { username email } }"#,
            None,
        )
        .await;
        assert_eq!(registered["data"]["register"]["username"], "alice");

        let login = run(
            &schema,
            r#"mutation { login(email: "alice@x.com", password: "secret123") { accessToken tokenType } }"#,
            None,
        )
        .await;
        let token = login["data"]["login"]["accessToken"].as_str().unwrap().to_string();
        assert_eq!(login["data"]["login"]["tokenType"], "Bearer");

        let me = run(&schema, "{ currentUser { username imageURL } }", Some(&token)).await;
        assert_eq!(me["data"]["currentUser"], json!({"username": "alice", "imageURL": null}));
    }

    #[tokio::test]
    async fn protected_fields_require_token() {
        let (state, fakes) = fake_state();
        let schema = build_schema(state);
        let res = run(&schema, r#"mutation { createPost(caption: "hi") { id } }"#, None).await;
        assert_eq!(res["errors"][0]["extensions"]["code"], 401);
        assert_eq!(res["errors"][0]["message"], "Missing or invalid token");
        assert_eq!(fakes.users.calls(), 0);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (state, _) = fake_state();
        let schema = build_schema(state);
        run(
            &schema,
            r#"mutation { register(username: "alice", email: "alice@x.com", password: "secret123") { id } }"#,
            None,
        )
        .await;
        let res = run(
            &schema,
            r#"mutation { login(email: "alice@x.com", password: "nope-nope") { accessToken } }"#,
            None,
        )
        .await;
        assert_eq!(res["errors"][0]["message"], "Invalid email or password");
        assert_eq!(res["errors"][0]["extensions"]["code"], 401);
    }

    #[tokio::test]
    async fn post_lifecycle() {
        let (state, _) = fake_state();
        let user = User::new("bob".into(), "bob@x.com".into(), "hash".into());
        state.users.create(user.clone()).await.unwrap();
        let token = state.auth.tokens().issue_access_token(user.id).unwrap();
        let schema = build_schema(state);

        let created = run(&schema, r#"mutation { createPost(caption: "first") { id userID } }"#, Some(&token)).await;
        let id = created["data"]["createPost"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["data"]["createPost"]["userID"], user.id.to_string());

        let edited = run(
            &schema,
            &format!(r#"mutation {{ updatePostCaption(id: "{id}", caption: "edited") {{ caption }} }}"#),
            Some(&token),
        )
        .await;
        assert_eq!(edited["data"]["updatePostCaption"]["caption"], "edited");

        let by_user = run(
            &schema,
            &format!(r#"{{ getPostsByUserID(userID: "{}") {{ caption }} }}"#, user.id),
            None,
        )
        .await;
        assert_eq!(by_user["data"]["getPostsByUserID"].as_array().unwrap().len(), 1);

        run(&schema, &format!(r#"mutation {{ deletePost(id: "{id}") }}"#), Some(&token)).await;
        let missing = run(&schema, &format!(r#"{{ getPostByID(id: "{id}") {{ id }} }}"#), None).await;
        assert_eq!(missing["errors"][0]["extensions"]["code"], 404);
    }
}
