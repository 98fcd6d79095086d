use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Document collections backing the forum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Users,
    Boards,
    Posts,
    Comments,
    Administrators,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Boards,
        Collection::Posts,
        Collection::Comments,
        Collection::Administrators,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Boards => "boards",
            Collection::Posts => "posts",
            Collection::Comments => "comments",
            Collection::Administrators => "administrators",
        }
    }

    /// Body fields that must hold distinct values across the collection
    pub fn unique_fields(&self) -> &'static [&'static str] {
        match self {
            Collection::Users => &["name"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw stored document: JSON body plus the optimistic-concurrency version
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: Uuid,
    pub version: i64,
    pub body: Value,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} document not found: {id}")]
    NotFound { collection: Collection, id: Uuid },

    #[error("duplicate {field} in {collection}")]
    DuplicateKey { collection: Collection, field: String },

    #[error("{collection} document {id} was modified concurrently")]
    VersionConflict { collection: Collection, id: Uuid },

    #[error("{0} operation timed out")]
    Timeout(Collection),

    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Opaque CRUD capability over JSON documents grouped in collections.
///
/// Writes that modify or remove an existing document take the version the
/// caller observed; implementations reject the write with
/// [`StoreError::VersionConflict`] when the stored version has moved on.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<StoredDocument>, StoreError>;

    /// Exact match on a top-level body field
    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>, StoreError>;

    /// Case-insensitive regular expression match on a top-level body field
    async fn search_field(
        &self,
        collection: Collection,
        field: &str,
        pattern: &str,
    ) -> Result<Vec<StoredDocument>, StoreError>;

    async fn list(&self, collection: Collection) -> Result<Vec<StoredDocument>, StoreError>;

    async fn insert_one(&self, collection: Collection, id: Uuid, body: Value) -> Result<StoredDocument, StoreError>;

    /// Inserts every document or none of them
    async fn insert_many(&self, collection: Collection, docs: Vec<(Uuid, Value)>) -> Result<usize, StoreError>;

    /// Merges `patch` into the top level of the stored body
    async fn update_by_id(
        &self,
        collection: Collection,
        id: Uuid,
        expected_version: i64,
        patch: Map<String, Value>,
    ) -> Result<StoredDocument, StoreError>;

    async fn delete_by_id(&self, collection: Collection, id: Uuid, expected_version: i64) -> Result<(), StoreError>;

    async fn drop_collection(&self, collection: Collection) -> Result<(), StoreError>;
}

/// String form of a field value used for pattern matching; non-scalar values never match
pub(crate) fn searchable_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
