// handlers/protected/posts.rs - Post writes

use axum::extract::State;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::RequesterBody;
use crate::auth::Credentials;
use crate::database::models::Post;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, PathParams};
use crate::services::{NewPost, PostPatch};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePostBody {
    pub post: NewPost,
    pub requester: Credentials,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostBody {
    pub post: PostPatch,
    pub requester: Credentials,
}

/// POST /boards/:id/posts - any authenticated user; author is the requester
pub async fn post_create(
    State(state): State<Arc<AppState>>,
    PathParams(board_id): PathParams<Uuid>,
    JsonBody(body): JsonBody<CreatePostBody>,
) -> ApiResult<Post> {
    Ok(ApiResponse::created(
        state.posts.create(board_id, body.post, &body.requester).await?,
    ))
}

/// PUT /boards/:id/posts/:post_id - author, board moderator or administrator
pub async fn post_update(
    State(state): State<Arc<AppState>>,
    PathParams((board_id, post_id)): PathParams<(Uuid, Uuid)>,
    JsonBody(body): JsonBody<UpdatePostBody>,
) -> ApiResult<Post> {
    Ok(ApiResponse::success(
        state.posts.update(board_id, post_id, body.post, &body.requester).await?,
    ))
}

/// DELETE /boards/:id/posts/:post_id
pub async fn post_delete(
    State(state): State<Arc<AppState>>,
    PathParams((board_id, post_id)): PathParams<(Uuid, Uuid)>,
    JsonBody(body): JsonBody<RequesterBody>,
) -> ApiResult<()> {
    state.posts.delete(board_id, post_id, &body.requester).await?;
    Ok(ApiResponse::no_content())
}
