// handlers/public/boards.rs - Board reads

use axum::extract::{Query, State};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::Board;
use crate::middleware::{ApiResponse, ApiResult, PathParams};
use crate::state::AppState;

/// GET /boards
pub async fn board_list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Board>> {
    Ok(ApiResponse::success(state.boards.list().await?))
}

/// GET /boards/:id
pub async fn board_get(State(state): State<Arc<AppState>>, PathParams(id): PathParams<Uuid>) -> ApiResult<Board> {
    Ok(ApiResponse::success(state.boards.get(id).await?))
}

/// GET /boards/search?field=pattern[&field=pattern...]
pub async fn board_search(
    State(state): State<Arc<AppState>>,
    Query(terms): Query<Vec<(String, String)>>,
) -> ApiResult<Vec<Board>> {
    Ok(ApiResponse::success(state.boards.search(&terms).await?))
}
