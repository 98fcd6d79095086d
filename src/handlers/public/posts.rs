// handlers/public/posts.rs - Post reads, always scoped to a board

use axum::extract::{Query, State};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::Post;
use crate::middleware::{ApiResponse, ApiResult, PathParams};
use crate::state::AppState;

/// GET /boards/:id/posts
pub async fn post_list(State(state): State<Arc<AppState>>, PathParams(board_id): PathParams<Uuid>) -> ApiResult<Vec<Post>> {
    Ok(ApiResponse::success(state.posts.list(board_id).await?))
}

/// GET /boards/:id/posts/:post_id
pub async fn post_get(
    State(state): State<Arc<AppState>>,
    PathParams((board_id, post_id)): PathParams<(Uuid, Uuid)>,
) -> ApiResult<Post> {
    Ok(ApiResponse::success(state.posts.get(board_id, post_id).await?))
}

/// GET /boards/:id/posts/search?field=pattern[&field=pattern...]
pub async fn post_search(
    State(state): State<Arc<AppState>>,
    PathParams(board_id): PathParams<Uuid>,
    Query(terms): Query<Vec<(String, String)>>,
) -> ApiResult<Vec<Post>> {
    Ok(ApiResponse::success(state.posts.search(board_id, &terms).await?))
}
