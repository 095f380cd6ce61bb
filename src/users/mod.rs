pub mod dto;
pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router(upload_limit: usize) -> Router<AppState> {
    handlers::user_routes(upload_limit)
}
