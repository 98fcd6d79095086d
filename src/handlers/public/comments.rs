// handlers/public/comments.rs - Comment reads

use axum::extract::State;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::Comment;
use crate::middleware::{ApiResponse, ApiResult, PathParams};
use crate::state::AppState;

/// GET /boards/:id/posts/:post_id/comments
pub async fn comment_list(
    State(state): State<Arc<AppState>>,
    PathParams((board_id, post_id)): PathParams<(Uuid, Uuid)>,
) -> ApiResult<Vec<Comment>> {
    Ok(ApiResponse::success(state.comments.list(board_id, post_id).await?))
}

/// GET /boards/:id/posts/:post_id/comments/:comment_id
pub async fn comment_get(
    State(state): State<Arc<AppState>>,
    PathParams((board_id, post_id, comment_id)): PathParams<(Uuid, Uuid, Uuid)>,
) -> ApiResult<Comment> {
    Ok(ApiResponse::success(state.comments.get(board_id, post_id, comment_id).await?))
}
