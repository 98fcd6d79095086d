// handlers/elevated/admins.rs - Administrator grants

use axum::extract::State;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult, JsonBody, PathParams};
use crate::state::AppState;

use crate::handlers::protected::RequesterBody;

#[derive(Debug, Serialize)]
pub struct AdminChange {
    pub user_id: Uuid,
    pub administrator: bool,
    /// False when the user already had the requested standing
    pub changed: bool,
}

/// PUT /admins/:user_id
pub async fn admin_grant(
    State(state): State<Arc<AppState>>,
    PathParams(user_id): PathParams<Uuid>,
    JsonBody(body): JsonBody<RequesterBody>,
) -> ApiResult<AdminChange> {
    let changed = state.users.grant_admin(user_id, &body.requester).await?;
    Ok(ApiResponse::success(AdminChange {
        user_id,
        administrator: true,
        changed,
    }))
}

/// DELETE /admins/:user_id
pub async fn admin_revoke(
    State(state): State<Arc<AppState>>,
    PathParams(user_id): PathParams<Uuid>,
    JsonBody(body): JsonBody<RequesterBody>,
) -> ApiResult<AdminChange> {
    let changed = state.users.revoke_admin(user_id, &body.requester).await?;
    Ok(ApiResponse::success(AdminChange {
        user_id,
        administrator: false,
        changed,
    }))
}
