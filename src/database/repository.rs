use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::database::store::{Collection, DocumentStore, StoreError, StoredDocument};

/// A typed entity persisted in one collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;
    /// Body fields that may be targeted by pattern search
    const SEARCHABLE: &'static [&'static str];

    fn id(&self) -> Uuid;
}

/// A decoded document together with the store version it was read at
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: i64,
    pub doc: T,
}

impl<T> Versioned<T> {
    pub fn into_inner(self) -> T {
        self.doc
    }
}

impl<T> Deref for Versioned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.doc
    }
}

/// Typed access to one collection; every call is bounded by the operation timeout
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            timeout: self.timeout,
            _phantom: PhantomData,
        }
    }
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self {
            store,
            timeout,
            _phantom: PhantomData,
        }
    }

    async fn bounded<R>(&self, op: impl Future<Output = Result<R, StoreError>>) -> Result<R, StoreError> {
        tokio::time::timeout(self.timeout, op)
            .await
            .map_err(|_| StoreError::Timeout(T::COLLECTION))?
    }

    fn decode(doc: StoredDocument) -> Result<Versioned<T>, StoreError> {
        Ok(Versioned {
            version: doc.version,
            doc: serde_json::from_value(doc.body)?,
        })
    }

    fn decode_all(docs: Vec<StoredDocument>) -> Result<Vec<Versioned<T>>, StoreError> {
        docs.into_iter().map(Self::decode).collect()
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Versioned<T>>, StoreError> {
        let doc = self.bounded(self.store.find_by_id(T::COLLECTION, id)).await?;
        doc.map(Self::decode).transpose()
    }

    pub async fn get_404(&self, id: Uuid) -> Result<Versioned<T>, StoreError> {
        self.find(id).await?.ok_or(StoreError::NotFound {
            collection: T::COLLECTION,
            id,
        })
    }

    pub async fn find_by(&self, field: &str, value: impl Serialize) -> Result<Vec<Versioned<T>>, StoreError> {
        let value = serde_json::to_value(value)?;
        let docs = self.bounded(self.store.find_by_field(T::COLLECTION, field, &value)).await?;
        Self::decode_all(docs)
    }

    pub async fn find_one_by(&self, field: &str, value: impl Serialize) -> Result<Option<Versioned<T>>, StoreError> {
        Ok(self.find_by(field, value).await?.into_iter().next())
    }

    pub async fn list(&self) -> Result<Vec<Versioned<T>>, StoreError> {
        let docs = self.bounded(self.store.list(T::COLLECTION)).await?;
        Self::decode_all(docs)
    }

    pub async fn search(&self, field: &str, pattern: &str) -> Result<Vec<Versioned<T>>, StoreError> {
        let docs = self.bounded(self.store.search_field(T::COLLECTION, field, pattern)).await?;
        Self::decode_all(docs)
    }

    pub async fn insert(&self, doc: &T) -> Result<Versioned<T>, StoreError> {
        let body = serde_json::to_value(doc)?;
        let stored = self.bounded(self.store.insert_one(T::COLLECTION, doc.id(), body)).await?;
        Self::decode(stored)
    }

    pub async fn insert_many(&self, docs: &[T]) -> Result<usize, StoreError> {
        let batch = docs
            .iter()
            .map(|doc| Ok((doc.id(), serde_json::to_value(doc)?)))
            .collect::<Result<Vec<_>, StoreError>>()?;
        self.bounded(self.store.insert_many(T::COLLECTION, batch)).await
    }

    /// Applies `patch` only if the document is still at the version `current` was read at
    pub async fn update(&self, current: &Versioned<T>, patch: Map<String, Value>) -> Result<Versioned<T>, StoreError> {
        let stored = self
            .bounded(
                self.store
                    .update_by_id(T::COLLECTION, current.id(), current.version, patch),
            )
            .await?;
        Self::decode(stored)
    }

    pub async fn delete(&self, current: &Versioned<T>) -> Result<(), StoreError> {
        self.bounded(self.store.delete_by_id(T::COLLECTION, current.id(), current.version))
            .await
    }
}
