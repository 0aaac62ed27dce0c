//! Per-document SQLite backend.
//!
//! # Invariants
//! - One row per record, keyed by `(collection, id)`.
//! - `seq` is assigned once on insert and never changes, so a replaced
//!   record keeps its position.
//! - Listing order follows the collection's [`Placement`]: newest first for
//!   prepend collections, insertion order otherwise.

use super::{document_id, Collection, Document, Placement, StorageBackend};
use crate::error::{FolioError, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    seq INTEGER NOT NULL,
    body TEXT NOT NULL,
    PRIMARY KEY (collection, id)
);
CREATE INDEX IF NOT EXISTS documents_collection_seq ON documents (collection, seq);
";

pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
    location: Option<PathBuf>,
}

impl SqliteBackend {
    /// Opens (or creates) a database file and applies the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();
        let conn = Connection::open(path)?;
        bootstrap_connection(&conn)?;
        tracing::info!(
            path = %path.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "sqlite store opened"
        );
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        bootstrap_connection(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location: None,
        })
    }

    /// Run a closure against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| FolioError::Store("SQLite connection lock poisoned".to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| FolioError::Store(format!("SQLite task failed: {}", e)))?
    }
}

fn bootstrap_connection(conn: &Connection) -> Result<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

fn parse_body(collection: Collection, body: &str) -> Result<Document> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    match value {
        serde_json::Value::Object(document) => Ok(document),
        _ => Err(FolioError::Store(format!(
            "Malformed {} row: body is not a JSON object",
            collection
        ))),
    }
}

#[async_trait]
impl StorageBackend for SqliteBackend {
    async fn load_all(&self, collection: Collection) -> Result<Vec<Document>> {
        self.with_conn(move |conn| {
            let sql = match collection.placement() {
                Placement::Prepend => {
                    "SELECT body FROM documents WHERE collection = ?1 ORDER BY seq DESC"
                }
                Placement::Append => {
                    "SELECT body FROM documents WHERE collection = ?1 ORDER BY seq ASC"
                }
            };
            let mut stmt = conn.prepare(sql)?;
            let bodies = stmt
                .query_map(params![collection.slug()], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            bodies
                .iter()
                .map(|body| parse_body(collection, body))
                .collect()
        })
        .await
    }

    async fn load(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let body: Option<String> = conn
                .query_row(
                    "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection.slug(), id],
                    |row| row.get(0),
                )
                .optional()?;
            body.map(|body| parse_body(collection, &body)).transpose()
        })
        .await
    }

    async fn put(&self, collection: Collection, document: Document) -> Result<()> {
        let id = document_id(&document)
            .ok_or_else(|| FolioError::Store("Document has no id".to_string()))?
            .to_string();
        let body = serde_json::to_string(&document)?;
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO documents (collection, id, seq, body)
                 VALUES (
                    ?1,
                    ?2,
                    (SELECT COALESCE(MAX(seq), 0) + 1 FROM documents WHERE collection = ?1),
                    ?3
                 )
                 ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body",
                params![collection.slug(), id, body],
            )?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, collection: Collection, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection.slug(), id],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    fn describe(&self) -> String {
        match &self.location {
            Some(path) => format!("sqlite:{}", path.display()),
            None => "sqlite::memory:".to_string(),
        }
    }
}
