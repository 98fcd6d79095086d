// services/mod.rs - Business operations behind the HTTP handlers
//
// Every mutation follows the same shape: authenticate the requester, fetch
// the target (and its parent board when moderation applies), run the
// authorization gate, then write with the version observed at fetch time.

pub mod board_service;
pub mod comment_service;
pub mod popular_service;
pub mod post_service;
pub mod transfer_service;
pub mod user_service;

pub use board_service::{BoardPatch, BoardService, NewBoard};
pub use comment_service::{CommentPatch, CommentService, NewComment};
pub use popular_service::{PopularPost, PopularService, PopularUser};
pub use post_service::{NewPost, PostPatch, PostService};
pub use transfer_service::{Dump, ImportReport, TransferService};
pub use user_service::{NewUser, UserPatch, UserService};

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::auth::AuthError;
use crate::database::StoreError;
use crate::search::SearchError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("name is taken: {0}")]
    NameTaken(String),

    #[error("{0}")]
    NotFound(String),

    /// Some collections were imported, the listed ones were not
    #[error("import failed for {} collection(s)", failures.len())]
    ImportFailed {
        imported: usize,
        failures: Vec<(String, String)>,
    },
}

impl ServiceError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) fn require_non_empty(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Top-level field updates collected from optional request fields
#[derive(Debug, Default)]
pub(crate) struct Patch(Map<String, Value>);

impl Patch {
    pub fn set<V: Serialize>(&mut self, field: &str, value: Option<V>) -> ServiceResult<()> {
        if let Some(value) = value {
            self.0
                .insert(field.to_string(), serde_json::to_value(value).map_err(StoreError::from)?);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}
