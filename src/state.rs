use std::sync::Arc;

use crate::{
    auth::{jwt::TokenIssuer, repo::UserStore, repo_types::User, services::AuthService},
    comments::{repo::CommentStore, repo_types::Comment},
    config::AppConfig,
    db,
    likes::{repo::LikeStore, repo_types::Like},
    posts::{repo::PostStore, repo_types::Post},
    storage::{Storage, StorageClient},
    store::PgRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub comments: Arc<dyn CommentStore>,
    pub likes: Arc<dyn LikeStore>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(&config.database_url).await?;
        db::migrate(&pool).await?;

        let storage = Arc::new(Storage::new(&config.storage, "us-east-1").await?) as Arc<dyn StorageClient>;

        let users: Arc<dyn UserStore> = Arc::new(PgRepository::<User>::new(pool.clone()));
        let posts: Arc<dyn PostStore> = Arc::new(PgRepository::<Post>::new(pool.clone()));
        let comments: Arc<dyn CommentStore> = Arc::new(PgRepository::<Comment>::new(pool.clone()));
        let likes: Arc<dyn LikeStore> = Arc::new(PgRepository::<Like>::new(pool));

        Ok(Self::from_parts(config, users, posts, comments, likes, storage))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        comments: Arc<dyn CommentStore>,
        likes: Arc<dyn LikeStore>,
        storage: Arc<dyn StorageClient>,
    ) -> Self {
        let auth = Arc::new(AuthService::new(users.clone(), TokenIssuer::new(&config.jwt)));
        Self {
            config,
            auth,
            users,
            posts,
            comments,
            likes,
            storage,
        }
    }
}
