use super::{document_id, Collection, Document, Placement, StorageBackend};
use crate::error::{FolioError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// In-memory storage backend.
///
/// Behaves like a per-document store. The failure switches and artificial
/// latency exist so tests can drive the repository's error and timeout paths.
#[derive(Default)]
pub struct MemBackend {
    collections: Mutex<HashMap<Collection, Vec<Document>>>,
    simulate_read_error: AtomicBool,
    simulate_write_error: AtomicBool,
    latency: Mutex<Option<Duration>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable read error simulation for testing error handling.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.store(simulate, Ordering::SeqCst);
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Delay every operation, to exercise timeouts.
    pub fn set_latency(&self, latency: Option<Duration>) {
        if let Ok(mut slot) = self.latency.lock() {
            *slot = latency;
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Collection, Vec<Document>>>> {
        self.collections
            .lock()
            .map_err(|_| FolioError::Store("Memory backend lock poisoned".to_string()))
    }

    async fn before_read(&self) -> Result<()> {
        self.delay().await;
        if self.simulate_read_error.load(Ordering::SeqCst) {
            return Err(FolioError::Store("Simulated read error".to_string()));
        }
        Ok(())
    }

    async fn before_write(&self) -> Result<()> {
        self.delay().await;
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(FolioError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }

    async fn delay(&self) {
        let latency = self.latency.lock().ok().and_then(|slot| *slot);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl StorageBackend for MemBackend {
    async fn load_all(&self, collection: Collection) -> Result<Vec<Document>> {
        self.before_read().await?;
        let collections = self.lock()?;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn load(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        self.before_read().await?;
        let collections = self.lock()?;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| document_id(doc) == Some(id)))
            .cloned())
    }

    async fn put(&self, collection: Collection, document: Document) -> Result<()> {
        self.before_write().await?;
        let id = document_id(&document)
            .ok_or_else(|| FolioError::Store("Document has no id".to_string()))?
            .to_string();

        let mut collections = self.lock()?;
        let docs = collections.entry(collection).or_default();
        match docs
            .iter()
            .position(|doc| document_id(doc) == Some(id.as_str()))
        {
            Some(index) => docs[index] = document,
            None => match collection.placement() {
                Placement::Prepend => docs.insert(0, document),
                Placement::Append => docs.push(document),
            },
        }
        Ok(())
    }

    async fn remove(&self, collection: Collection, id: &str) -> Result<bool> {
        self.before_write().await?;
        let mut collections = self.lock()?;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| document_id(doc) != Some(id));
        Ok(docs.len() != before)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
