// handlers/public/popular.rs - Vote-ranked listings

use axum::extract::{Query, State};
use serde::Deserialize;
use std::sync::Arc;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{PopularPost, PopularUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    pub limit: Option<usize>,
}

/// GET / - posts across all boards, most voted first
pub async fn popular_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PopularQuery>,
) -> ApiResult<Vec<PopularPost>> {
    Ok(ApiResponse::success(state.popular.posts(query.limit).await?))
}

/// GET /users/popular - users ranked by votes on their posts and comments
pub async fn popular_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PopularQuery>,
) -> ApiResult<Vec<PopularUser>> {
    Ok(ApiResponse::success(state.popular.users(query.limit).await?))
}
