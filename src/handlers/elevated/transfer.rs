// handlers/elevated/transfer.rs - POST /export and POST /import

use axum::extract::State;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::Credentials;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::{Dump, ImportReport};
use crate::state::AppState;

use crate::handlers::protected::RequesterBody;

#[derive(Debug, Deserialize)]
pub struct ImportBody {
    #[serde(flatten)]
    pub dump: Dump,
    pub requester: Credentials,
}

/// POST /export - every user, board, post and comment, password hashes included
pub async fn export_post(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<RequesterBody>,
) -> ApiResult<Dump> {
    Ok(ApiResponse::success(state.transfer.export(&body.requester).await?))
}

/**
 * POST /import - Bulk insert documents produced by /export
 *
 * Expected Input:
 * ```json
 * { "users": [...], "boards": [...], "posts": [...], "comments": [...], "requester": {...} }
 * ```
 *
 * Each collection is inserted atomically, but collections are independent:
 * when one fails the others stay imported and the response is 422 naming
 * the failed collections.
 */
pub async fn import_post(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<ImportBody>,
) -> ApiResult<ImportReport> {
    Ok(ApiResponse::created(state.transfer.import(body.dump, &body.requester).await?))
}
