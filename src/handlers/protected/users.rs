// handlers/protected/users.rs - Account updates and deletion

use axum::extract::State;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::RequesterBody;
use crate::auth::Credentials;
use crate::database::models::Profile;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, PathParams};
use crate::services::UserPatch;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateUserBody {
    pub user: UserPatch,
    pub requester: Credentials,
}

/// PUT /users/:id - the account holder or an administrator
pub async fn user_update(
    State(state): State<Arc<AppState>>,
    PathParams(id): PathParams<Uuid>,
    JsonBody(body): JsonBody<UpdateUserBody>,
) -> ApiResult<Profile> {
    Ok(ApiResponse::success(state.users.update(id, body.user, &body.requester).await?))
}

/// DELETE /users/:id - the account holder only
pub async fn user_delete(
    State(state): State<Arc<AppState>>,
    PathParams(id): PathParams<Uuid>,
    JsonBody(body): JsonBody<RequesterBody>,
) -> ApiResult<()> {
    state.users.delete(id, &body.requester).await?;
    Ok(ApiResponse::no_content())
}
