// handlers/protected/boards.rs - Board creation and moderation

use axum::extract::State;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::RequesterBody;
use crate::auth::Credentials;
use crate::database::models::Board;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, PathParams};
use crate::services::{BoardPatch, NewBoard};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBoardBody {
    pub board: NewBoard,
    pub requester: Credentials,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBoardBody {
    pub board: BoardPatch,
    pub requester: Credentials,
}

/// POST /boards - the requester becomes the owner
pub async fn board_create(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<CreateBoardBody>,
) -> ApiResult<Board> {
    Ok(ApiResponse::created(state.boards.create(body.board, &body.requester).await?))
}

/// PUT /boards/:id - owner, moderator or administrator
pub async fn board_update(
    State(state): State<Arc<AppState>>,
    PathParams(id): PathParams<Uuid>,
    JsonBody(body): JsonBody<UpdateBoardBody>,
) -> ApiResult<Board> {
    Ok(ApiResponse::success(state.boards.update(id, body.board, &body.requester).await?))
}

/// DELETE /boards/:id - posts and comments on the board are left in place
pub async fn board_delete(
    State(state): State<Arc<AppState>>,
    PathParams(id): PathParams<Uuid>,
    JsonBody(body): JsonBody<RequesterBody>,
) -> ApiResult<()> {
    state.boards.delete(id, &body.requester).await?;
    Ok(ApiResponse::no_content())
}
