// handlers/protected/comments.rs - Comment writes

use axum::extract::State;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::RequesterBody;
use crate::auth::Credentials;
use crate::database::models::Comment;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, PathParams};
use crate::services::{CommentPatch, NewComment};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCommentBody {
    pub comment: NewComment,
    pub requester: Credentials,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentBody {
    pub comment: CommentPatch,
    pub requester: Credentials,
}

/// POST /boards/:id/posts/:post_id/comments
pub async fn comment_create(
    State(state): State<Arc<AppState>>,
    PathParams((board_id, post_id)): PathParams<(Uuid, Uuid)>,
    JsonBody(body): JsonBody<CreateCommentBody>,
) -> ApiResult<Comment> {
    Ok(ApiResponse::created(
        state
            .comments
            .create(board_id, post_id, body.comment, &body.requester)
            .await?,
    ))
}

/// PUT /boards/:id/posts/:post_id/comments/:comment_id
pub async fn comment_update(
    State(state): State<Arc<AppState>>,
    PathParams((board_id, post_id, comment_id)): PathParams<(Uuid, Uuid, Uuid)>,
    JsonBody(body): JsonBody<UpdateCommentBody>,
) -> ApiResult<Comment> {
    Ok(ApiResponse::success(
        state
            .comments
            .update(board_id, post_id, comment_id, body.comment, &body.requester)
            .await?,
    ))
}

/// DELETE /boards/:id/posts/:post_id/comments/:comment_id
pub async fn comment_delete(
    State(state): State<Arc<AppState>>,
    PathParams((board_id, post_id, comment_id)): PathParams<(Uuid, Uuid, Uuid)>,
    JsonBody(body): JsonBody<RequesterBody>,
) -> ApiResult<()> {
    state
        .comments
        .delete(board_id, post_id, comment_id, &body.requester)
        .await?;
    Ok(ApiResponse::no_content())
}
