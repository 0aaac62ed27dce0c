//! # Storage Layer
//!
//! This module defines the storage abstraction for folio. The [`StorageBackend`]
//! trait is the only thing the repository layer knows about persistence: four
//! operations over a named [`Collection`] of JSON documents.
//!
//! ## Backends
//!
//! - [`fs_backend::FsBackend`]: **whole-document** storage. A collection lives in
//!   a JSON file (or a section of one). Every write reads the entire file,
//!   mutates it in memory and writes it back (temp file + rename).
//! - [`sqlite_backend::SqliteBackend`]: **per-document** storage. Each record is
//!   its own row; writes only touch the addressed record.
//! - [`mem_backend::MemBackend`]: per-document, in memory. Used by tests and by
//!   `--backend memory` for throwaway sessions.
//!
//! ## Concurrency
//!
//! There is no locking and no version field. The whole-document backend is
//! last-writer-wins: two writers that both read before either writes will lose
//! one update. This is accepted for a single-admin deployment and must be
//! revisited (per-record version/etag, or the per-document backend) before
//! serving several concurrent editors.
//!
//! ## Storage Layout (whole-document)
//!
//! ```text
//! data/
//! ├── portfolio.json    # { personalInfo: {}, aboutInfo: {}, contactInfo: {},
//! │                     #   siteSettings: {}, skillCategories: [] }
//! ├── projects.json     # [ ... ] newest first
//! └── experiences.json  # [ ... ] newest first
//! ```

use crate::error::{FolioError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

pub mod fs_backend;
pub mod mem_backend;
pub mod sqlite_backend;

/// A stored record as the backend sees it: a JSON object carrying an `id`.
pub type Document = Map<String, Value>;

pub const PORTFOLIO_FILE: &str = "portfolio.json";
pub const PROJECTS_FILE: &str = "projects.json";
pub const EXPERIENCES_FILE: &str = "experiences.json";
pub const SQLITE_FILE: &str = "folio.db";

/// Where a newly created record lands in storage-native order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Prepend,
    Append,
}

/// The seven content collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    PersonalInfo,
    AboutInfo,
    ContactInfo,
    SiteSettings,
    SkillCategories,
    Projects,
    Experiences,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::PersonalInfo,
        Collection::AboutInfo,
        Collection::ContactInfo,
        Collection::SiteSettings,
        Collection::SkillCategories,
        Collection::Projects,
        Collection::Experiences,
    ];

    /// URL/CLI name of the collection.
    pub fn slug(&self) -> &'static str {
        match self {
            Collection::PersonalInfo => "personal-info",
            Collection::AboutInfo => "about-info",
            Collection::ContactInfo => "contact-info",
            Collection::SiteSettings => "site-settings",
            Collection::SkillCategories => "skill-categories",
            Collection::Projects => "projects",
            Collection::Experiences => "experiences",
        }
    }

    /// Collections that hold at most one live record by convention.
    pub fn is_singleton(&self) -> bool {
        matches!(
            self,
            Collection::PersonalInfo
                | Collection::AboutInfo
                | Collection::ContactInfo
                | Collection::SiteSettings
        )
    }

    /// File holding this collection under the whole-document layout.
    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Projects => PROJECTS_FILE,
            Collection::Experiences => EXPERIENCES_FILE,
            _ => PORTFOLIO_FILE,
        }
    }

    /// Key inside the file, or `None` when the file is a top-level array.
    pub fn section(&self) -> Option<&'static str> {
        match self {
            Collection::PersonalInfo => Some("personalInfo"),
            Collection::AboutInfo => Some("aboutInfo"),
            Collection::ContactInfo => Some("contactInfo"),
            Collection::SiteSettings => Some("siteSettings"),
            Collection::SkillCategories => Some("skillCategories"),
            Collection::Projects | Collection::Experiences => None,
        }
    }

    pub fn placement(&self) -> Placement {
        match self {
            Collection::Projects | Collection::Experiences => Placement::Prepend,
            _ => Placement::Append,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Collection {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Collection::ALL
            .into_iter()
            .find(|c| c.slug() == wanted)
            .ok_or_else(|| FolioError::InvalidInput(format!("Unknown collection: {}", s)))
    }
}

/// Extract the `id` of a stored document.
pub fn document_id(document: &Document) -> Option<&str> {
    document.get("id").and_then(Value::as_str)
}

/// Abstract interface for raw document I/O.
///
/// This trait handles the "how" of storage (file, database, memory), while
/// [`crate::repository::Repository`] handles the "what" (ids, timestamps,
/// merging, typing).
///
/// Absence is never an error here: a collection that was never written loads
/// as empty, and an unknown id loads as `None`. Errors mean the storage
/// itself failed or held data that could not be parsed.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Every document in the collection, in storage-native order.
    async fn load_all(&self, collection: Collection) -> Result<Vec<Document>>;

    /// The document with the given id, if present.
    async fn load(&self, collection: Collection, id: &str) -> Result<Option<Document>>;

    /// Insert the document, or replace the stored one with the same `id`.
    /// A replaced document keeps its position.
    async fn put(&self, collection: Collection, document: Document) -> Result<()>;

    /// Remove the document. Returns `false` if no such id was stored.
    async fn remove(&self, collection: Collection, id: &str) -> Result<bool>;

    /// Short human-readable description, used in logs.
    fn describe(&self) -> String;
}

/// Which backend implementation to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Json,
    Sqlite,
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendKind::Json => "json",
            BackendKind::Sqlite => "sqlite",
            BackendKind::Memory => "memory",
        })
    }
}

impl FromStr for BackendKind {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "file" | "fs" => Ok(BackendKind::Json),
            "sqlite" | "db" => Ok(BackendKind::Sqlite),
            "memory" | "mem" => Ok(BackendKind::Memory),
            other => Err(FolioError::InvalidInput(format!("Unknown backend: {}", other))),
        }
    }
}

/// Open the configured backend rooted at `data_dir`.
pub fn open_backend(kind: BackendKind, data_dir: &Path) -> Result<Arc<dyn StorageBackend>> {
    let backend: Arc<dyn StorageBackend> = match kind {
        BackendKind::Json => Arc::new(fs_backend::FsBackend::new(data_dir)),
        BackendKind::Sqlite => {
            std::fs::create_dir_all(data_dir)?;
            Arc::new(sqlite_backend::SqliteBackend::open(
                data_dir.join(SQLITE_FILE),
            )?)
        }
        BackendKind::Memory => Arc::new(mem_backend::MemBackend::new()),
    };
    tracing::info!(backend = %backend.describe(), "storage backend opened");
    Ok(backend)
}
