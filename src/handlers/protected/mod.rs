// handlers/protected/mod.rs - Protected handlers (requester credentials required)
//
// Security Level: Credential verification per request
// Routes: POST/PUT/DELETE on users, boards, posts and comments
//
// Request bodies pair the payload with the requester:
// ```json
// { "board": { ... }, "requester": { "name": "...", "password": "..." } }
// ```
// Deletes send only the requester. Whether the verified requester may
// touch the target (owner, board moderator, administrator) is decided in
// the service layer by the authorization gate, after the target is loaded.

use serde::Deserialize;

use crate::auth::Credentials;

pub mod boards;
pub mod comments;
pub mod posts;
pub mod users;

/// Body for requests that need nothing but the requester
#[derive(Debug, Deserialize)]
pub struct RequesterBody {
    pub requester: Credentials,
}
