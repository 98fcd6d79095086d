// database/memory.rs - In-process document store
//
// Backs local development and the test suite. Documents live in insertion
// order per collection behind a single tokio RwLock, so every operation is
// atomic with respect to the others.

use async_trait::async_trait;
use regex::RegexBuilder;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{searchable_text, Collection, DocumentStore, StoreError, StoredDocument};

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<StoredDocument>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_unique(
    collection: Collection,
    existing: &[StoredDocument],
    id: Uuid,
    body: &Value,
) -> Result<(), StoreError> {
    for field in collection.unique_fields() {
        let Some(candidate) = body.get(*field) else { continue };
        let taken = existing
            .iter()
            .any(|doc| doc.id != id && doc.body.get(*field) == Some(candidate));
        if taken {
            return Err(StoreError::DuplicateKey {
                collection,
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<StoredDocument>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned())
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| doc.body.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn search_field(
        &self,
        collection: Collection,
        field: &str,
        pattern: &str,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| StoreError::InvalidPattern(e.to_string()))?;

        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| {
                        doc.body
                            .get(field)
                            .and_then(searchable_text)
                            .is_some_and(|text| regex.is_match(&text))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list(&self, collection: Collection) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn insert_one(&self, collection: Collection, id: Uuid, body: Value) -> Result<StoredDocument, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        if docs.iter().any(|doc| doc.id == id) {
            return Err(StoreError::DuplicateKey {
                collection,
                field: "id".to_string(),
            });
        }
        check_unique(collection, docs, id, &body)?;

        let doc = StoredDocument { id, version: 1, body };
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn insert_many(&self, collection: Collection, batch: Vec<(Uuid, Value)>) -> Result<usize, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        // Validate the whole batch (against the store and itself) before touching anything
        let mut staged: Vec<StoredDocument> = Vec::with_capacity(batch.len());
        for (id, body) in batch {
            if docs.iter().chain(staged.iter()).any(|doc| doc.id == id) {
                return Err(StoreError::DuplicateKey {
                    collection,
                    field: "id".to_string(),
                });
            }
            check_unique(collection, docs, id, &body)?;
            check_unique(collection, &staged, id, &body)?;
            staged.push(StoredDocument { id, version: 1, body });
        }

        let inserted = staged.len();
        docs.extend(staged);
        Ok(inserted)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: Uuid,
        expected_version: i64,
        patch: Map<String, Value>,
    ) -> Result<StoredDocument, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        let index = docs
            .iter()
            .position(|doc| doc.id == id)
            .ok_or(StoreError::NotFound { collection, id })?;
        if docs[index].version != expected_version {
            return Err(StoreError::VersionConflict { collection, id });
        }

        let mut body = docs[index].body.clone();
        if let Value::Object(fields) = &mut body {
            fields.extend(patch);
        }
        check_unique(collection, docs, id, &body)?;

        let doc = &mut docs[index];
        doc.body = body;
        doc.version += 1;
        Ok(doc.clone())
    }

    async fn delete_by_id(&self, collection: Collection, id: Uuid, expected_version: i64) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        let index = docs
            .iter()
            .position(|doc| doc.id == id)
            .ok_or(StoreError::NotFound { collection, id })?;
        if docs[index].version != expected_version {
            return Err(StoreError::VersionConflict { collection, id });
        }

        docs.remove(index);
        Ok(())
    }

    async fn drop_collection(&self, collection: Collection) -> Result<(), StoreError> {
        self.collections.write().await.remove(&collection);
        Ok(())
    }
}
