//! # Record Repository
//!
//! [`Repository<T>`] is the one CRUD contract every content type goes through.
//! It owns id generation, timestamps and merging; the injected
//! [`StorageBackend`] owns the bytes.
//!
//! ## Contract
//!
//! | Operation | Absent target | Backend failure |
//! |-----------|---------------|-----------------|
//! | `get_all` | `Ok(vec![])`  | `Err`           |
//! | `get_by_id` | `Ok(None)`  | `Err`           |
//! | `create`  | n/a           | `Err`           |
//! | `update`  | `Err(NotFound)` | `Err`         |
//! | `delete`  | `Err(NotFound)` | `Err`         |
//!
//! Backend errors are always propagated, never swallowed. A malformed id is
//! indistinguishable from an unknown one.
//!
//! ## Singletons
//!
//! [`Singleton<T>`] layers the zero-or-one convention on top: `get` is the
//! first stored record, `upsert` updates it if present and creates otherwise.
//! Uniqueness is a caller convention. Two racing upserts can both create, and
//! the later record is then never read.
//!
//! Singleton records are read leniently: missing timestamps are filled on load
//! and written back by the next update. Collection records must be complete.

use crate::clock::{Clock, SystemClock};
use crate::error::{FolioError, Result};
use crate::model::{Content, Record, BASE_FIELDS};
use crate::store::{Collection, Document, StorageBackend};
use chrono::{DateTime, Duration as TimeDelta, Utc};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const MAX_ID_LEN: usize = 128;

/// Typed CRUD over one collection.
pub struct Repository<T: Content> {
    backend: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    timeout: Option<Duration>,
    _content: PhantomData<fn() -> T>,
}

impl<T: Content> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            clock: Arc::clone(&self.clock),
            timeout: self.timeout,
            _content: PhantomData,
        }
    }
}

impl<T: Content> Repository<T> {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            clock: Arc::new(SystemClock),
            timeout: None,
            _content: PhantomData,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Bound every backend round trip. Expiry surfaces as a backend failure.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn collection(&self) -> Collection {
        T::COLLECTION
    }

    /// Every record, in storage-native order. Never-written collections are empty.
    pub async fn get_all(&self) -> Result<Vec<Record<T>>> {
        let documents = self.bounded(self.backend.load_all(T::COLLECTION)).await?;
        documents
            .into_iter()
            .map(|document| self.decode(document))
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Record<T>>> {
        if !is_well_formed_id(id) {
            return Ok(None);
        }
        let document = self.bounded(self.backend.load(T::COLLECTION, id)).await?;
        document.map(|document| self.decode(document)).transpose()
    }

    /// Assign a fresh id, stamp both timestamps, persist, and return the record.
    pub async fn create(&self, data: T) -> Result<Record<T>> {
        let now = self.clock.now();
        let record = Record {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            data,
        };
        let document = to_document(&record)?;
        self.bounded(self.backend.put(T::COLLECTION, document))
            .await?;

        tracing::debug!(collection = %T::COLLECTION, id = %record.id, "record created");
        Ok(record)
    }

    /// Shallow-merge `patch` over the stored record and refresh `updatedAt`.
    ///
    /// `patch` may be a typed `T::Patch`, a full `T`, or a raw JSON object.
    /// Top-level keys replace stored keys; nested objects are replaced whole.
    /// Base fields in the patch are ignored. If the merged document no longer
    /// has the shape of `T` nothing is written and the call fails with a
    /// validation error.
    pub async fn update<P>(&self, id: &str, patch: &P) -> Result<Record<T>>
    where
        P: Serialize + ?Sized,
    {
        let patch = patch_object::<T, P>(patch)?;
        if !is_well_formed_id(id) {
            return Err(FolioError::not_found(T::COLLECTION, id));
        }

        let mut document = self
            .bounded(self.backend.load(T::COLLECTION, id))
            .await?
            .ok_or_else(|| FolioError::not_found(T::COLLECTION, id))?;
        self.fill_timestamps(&mut document)?;

        let previous = stored_updated_at(&document);
        for (key, value) in patch {
            if BASE_FIELDS.contains(&key.as_str()) {
                continue;
            }
            document.insert(key, value);
        }
        let updated_at = self.next_timestamp(previous);
        document.insert("updatedAt".to_string(), serde_json::to_value(updated_at)?);
        document.insert("id".to_string(), Value::String(id.to_string()));

        let record: Record<T> = serde_json::from_value(Value::Object(document.clone()))
            .map_err(|e| FolioError::validation(T::COLLECTION, e.to_string()))?;

        self.bounded(self.backend.put(T::COLLECTION, document))
            .await?;

        tracing::debug!(collection = %T::COLLECTION, id = %id, "record updated");
        Ok(record)
    }

    /// Permanently remove the record.
    pub async fn delete(&self, id: &str) -> Result<()> {
        if !is_well_formed_id(id) {
            return Err(FolioError::not_found(T::COLLECTION, id));
        }
        let removed = self
            .bounded(self.backend.remove(T::COLLECTION, id))
            .await?;
        if !removed {
            return Err(FolioError::not_found(T::COLLECTION, id));
        }

        tracing::debug!(collection = %T::COLLECTION, id = %id, "record deleted");
        Ok(())
    }

    /// `now`, or one millisecond past the stored stamp if the clock has not
    /// moved beyond it, so `updatedAt` strictly increases per mutation.
    fn next_timestamp(&self, previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
        let now = self.clock.now();
        match previous {
            Some(previous) if now <= previous => previous + TimeDelta::milliseconds(1),
            _ => now,
        }
    }

    fn decode(&self, mut document: Document) -> Result<Record<T>> {
        self.fill_timestamps(&mut document)?;
        from_document(document)
    }

    /// Singleton sections saved by other writers may lack `createdAt`, or
    /// both timestamps. `createdAt` falls back to `updatedAt`, which falls
    /// back to now. The next update persists the filled values.
    fn fill_timestamps(&self, document: &mut Document) -> Result<()> {
        if !T::COLLECTION.is_singleton() {
            return Ok(());
        }
        if !document.contains_key("updatedAt") {
            document.insert("updatedAt".to_string(), serde_json::to_value(self.clock.now())?);
        }
        if !document.contains_key("createdAt") {
            if let Some(updated_at) = document.get("updatedAt").cloned() {
                document.insert("createdAt".to_string(), updated_at);
            }
        }
        Ok(())
    }

    async fn bounded<F, R>(&self, op: F) -> Result<R>
    where
        F: Future<Output = Result<R>>,
    {
        match self.timeout {
            None => op.await,
            Some(limit) => match tokio::time::timeout(limit, op).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::error!(
                        collection = %T::COLLECTION,
                        backend = %self.backend.describe(),
                        timeout_ms = limit.as_millis() as u64,
                        "storage backend timed out"
                    );
                    Err(FolioError::Timeout(limit.as_millis() as u64))
                }
            },
        }
    }
}

/// Ids are opaque, but anything that could never have been generated is
/// treated as unknown without asking the backend.
pub fn is_well_formed_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && !id
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control() || c.is_whitespace())
}

fn to_document<T: Content>(record: &Record<T>) -> Result<Document> {
    match serde_json::to_value(record)? {
        Value::Object(document) => Ok(document),
        _ => Err(FolioError::validation(
            T::COLLECTION,
            "payload did not serialize to a JSON object",
        )),
    }
}

fn from_document<T: Content>(document: Document) -> Result<Record<T>> {
    serde_json::from_value(Value::Object(document)).map_err(|e| {
        tracing::error!(collection = %T::COLLECTION, error = %e, "stored record is malformed");
        FolioError::Serialization(e)
    })
}

fn patch_object<T: Content, P: Serialize + ?Sized>(patch: &P) -> Result<Document> {
    match serde_json::to_value(patch)? {
        Value::Object(object) => Ok(object),
        other => Err(FolioError::validation(
            T::COLLECTION,
            format!("patch must be a JSON object, got {}", json_type(&other)),
        )),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn stored_updated_at(document: &Document) -> Option<DateTime<Utc>> {
    document
        .get("updatedAt")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Zero-or-one record view over a singleton collection.
pub struct Singleton<T: Content> {
    repo: Repository<T>,
}

impl<T: Content> Clone for Singleton<T> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<T: Content> Singleton<T> {
    pub fn new(repo: Repository<T>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository<T> {
        &self.repo
    }

    /// The first stored record, if any.
    pub async fn get(&self) -> Result<Option<Record<T>>> {
        let records = self.repo.get_all().await?;
        if records.len() > 1 {
            tracing::warn!(
                collection = %T::COLLECTION,
                count = records.len(),
                "singleton collection holds several records; reading the first"
            );
        }
        Ok(records.into_iter().next())
    }

    /// Update the existing record with `data`, or create it.
    pub async fn upsert(&self, data: T) -> Result<Record<T>> {
        match self.get().await? {
            Some(existing) => self.repo.update(&existing.id, &data).await,
            None => self.repo.create(data).await,
        }
    }

    pub async fn update<P>(&self, id: &str, patch: &P) -> Result<Record<T>>
    where
        P: Serialize + ?Sized,
    {
        self.repo.update(id, patch).await
    }
}
