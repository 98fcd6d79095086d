// handlers/public/users.rs - Anonymous user endpoints: reads and registration

use axum::extract::{Query, State};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::Profile;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, PathParams};
use crate::services::NewUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub user: NewUser,
}

/// GET /users
pub async fn user_list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Profile>> {
    Ok(ApiResponse::success(state.users.list().await?))
}

/// GET /users/:id
pub async fn user_get(State(state): State<Arc<AppState>>, PathParams(id): PathParams<Uuid>) -> ApiResult<Profile> {
    Ok(ApiResponse::success(state.users.get(id).await?))
}

/// GET /users/search?field=pattern[&field=pattern...]
pub async fn user_search(
    State(state): State<Arc<AppState>>,
    Query(terms): Query<Vec<(String, String)>>,
) -> ApiResult<Vec<Profile>> {
    Ok(ApiResponse::success(state.users.search(&terms).await?))
}

/**
 * POST /users - Register a new account
 *
 * Expected Input:
 * ```json
 * { "user": { "name": "...", "password": "...", "email": "...", "bio": "", "avatar": "", "pronouns": "" } }
 * ```
 *
 * The password is stored as an Argon2id hash and never returned.
 */
pub async fn user_register(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<RegisterBody>,
) -> ApiResult<Profile> {
    Ok(ApiResponse::created(state.users.register(body.user).await?))
}
