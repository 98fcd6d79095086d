// database/postgres.rs - PostgreSQL document store
//
// All collections share one `documents` table keyed by (collection, id) with a
// JSONB body. User names are kept unique by a partial expression index.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::info;
use uuid::Uuid;

use super::store::{Collection, DocumentStore, StoreError, StoredDocument};

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS documents (
        collection TEXT NOT NULL,
        id UUID NOT NULL,
        version BIGINT NOT NULL DEFAULT 1,
        body JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (collection, id)
    )"#,
    r#"CREATE UNIQUE INDEX IF NOT EXISTS documents_users_name_key
        ON documents ((body->>'name')) WHERE collection = 'users'"#,
];

// SQLSTATE codes surfaced by Postgres
const UNIQUE_VIOLATION: &str = "23505";
const INVALID_REGULAR_EXPRESSION: &str = "2201B";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the backing table and indexes when missing
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Document schema ready");
        Ok(())
    }

    fn row_to_document(row: &PgRow) -> Result<StoredDocument, StoreError> {
        Ok(StoredDocument {
            id: row.try_get("id")?,
            version: row.try_get("version")?,
            body: row.try_get("body")?,
        })
    }

    fn rows_to_documents(rows: Vec<PgRow>) -> Result<Vec<StoredDocument>, StoreError> {
        rows.iter().map(Self::row_to_document).collect()
    }

    fn map_write_error(collection: Collection, err: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let field = match db_err.constraint() {
                    Some("documents_users_name_key") => "name",
                    _ => "id",
                };
                return StoreError::DuplicateKey {
                    collection,
                    field: field.to_string(),
                };
            }
        }
        StoreError::Sqlx(err)
    }

    /// Distinguishes a missing document from a stale version after a guarded write matched nothing
    async fn missing_or_conflict(&self, collection: Collection, id: Uuid) -> StoreError {
        match self.find_by_id(collection, id).await {
            Ok(Some(_)) => StoreError::VersionConflict { collection, id },
            Ok(None) => StoreError::NotFound { collection, id },
            Err(e) => e,
        }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<StoredDocument>, StoreError> {
        let row = sqlx::query("SELECT id, version, body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_document).transpose()
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, version, body FROM documents \
             WHERE collection = $1 AND body -> $2 = $3 ORDER BY created_at",
        )
        .bind(collection.as_str())
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;
        Self::rows_to_documents(rows)
    }

    async fn search_field(
        &self,
        collection: Collection,
        field: &str,
        pattern: &str,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let result = sqlx::query(
            "SELECT id, version, body FROM documents \
             WHERE collection = $1 AND body ->> $2 ~* $3 ORDER BY created_at",
        )
        .bind(collection.as_str())
        .bind(field)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await;

        match result {
            Ok(rows) => Self::rows_to_documents(rows),
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some(INVALID_REGULAR_EXPRESSION) => {
                Err(StoreError::InvalidPattern(db_err.message().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, collection: Collection) -> Result<Vec<StoredDocument>, StoreError> {
        let rows = sqlx::query("SELECT id, version, body FROM documents WHERE collection = $1 ORDER BY created_at")
            .bind(collection.as_str())
            .fetch_all(&self.pool)
            .await?;
        Self::rows_to_documents(rows)
    }

    async fn insert_one(&self, collection: Collection, id: Uuid, body: Value) -> Result<StoredDocument, StoreError> {
        let row = sqlx::query(
            "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3) \
             RETURNING id, version, body",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(&body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(collection, e))?;
        Self::row_to_document(&row)
    }

    async fn insert_many(&self, collection: Collection, docs: Vec<(Uuid, Value)>) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;
        let count = docs.len();

        for (id, body) in docs {
            sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
                .bind(collection.as_str())
                .bind(id)
                .bind(&body)
                .execute(&mut *tx)
                .await
                .map_err(|e| Self::map_write_error(collection, e))?;
        }

        tx.commit().await?;
        Ok(count)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: Uuid,
        expected_version: i64,
        patch: Map<String, Value>,
    ) -> Result<StoredDocument, StoreError> {
        let row = sqlx::query(
            "UPDATE documents SET body = body || $4, version = version + 1 \
             WHERE collection = $1 AND id = $2 AND version = $3 \
             RETURNING id, version, body",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(expected_version)
        .bind(Value::Object(patch))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(collection, e))?;

        match row {
            Some(row) => Self::row_to_document(&row),
            None => Err(self.missing_or_conflict(collection, id).await),
        }
    }

    async fn delete_by_id(&self, collection: Collection, id: Uuid, expected_version: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2 AND version = $3")
            .bind(collection.as_str())
            .bind(id)
            .bind(expected_version)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.missing_or_conflict(collection, id).await);
        }
        Ok(())
    }

    async fn drop_collection(&self, collection: Collection) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1")
            .bind(collection.as_str())
            .execute(&self.pool)
            .await?;
        info!("Dropped {} documents from {}", result.rows_affected(), collection);
        Ok(())
    }
}
