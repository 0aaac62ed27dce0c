use super::{document_id, Collection, Document, Placement, StorageBackend};
use crate::error::{FolioError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Whole-document JSON backend.
///
/// Each file is read entirely, modified in memory and written back in full.
/// Sections of `portfolio.json` that this collection does not own are carried
/// through untouched.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.file_name())
    }

    /// Read and parse a file. A missing file reads as `None`.
    async fn read_file(&self, path: &Path) -> Result<Option<Value>> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(FolioError::Io(e)),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        let value = serde_json::from_str(&content).map_err(FolioError::Serialization)?;
        Ok(Some(value))
    }

    /// Atomic write. The temp-file write and the rename run as one spawned
    /// task, so a caller that stops waiting (a timeout) cannot leave the temp
    /// file behind without its rename.
    async fn write_file(&self, path: &Path, value: &Value) -> Result<()> {
        let content = serde_json::to_string_pretty(value).map_err(FolioError::Serialization)?;
        let root = self.root.clone();
        let path = path.to_path_buf();

        tokio::spawn(async move {
            ensure_dir(&root).await?;
            let tmp_path = root.join(format!(".folio-{}.tmp", Uuid::new_v4()));
            fs::write(&tmp_path, content).await.map_err(FolioError::Io)?;
            fs::rename(&tmp_path, &path).await.map_err(FolioError::Io)
        })
        .await
        .map_err(|e| FolioError::Store(format!("File write task failed: {}", e)))?
    }

    /// Load the whole file containing `collection`, plus the collection's
    /// documents extracted from it.
    async fn load_file(&self, collection: Collection) -> Result<(Value, Vec<Document>)> {
        let file = self.read_file(&self.file_path(collection)).await?;
        let file = match (file, collection.section()) {
            (Some(value), _) => value,
            (None, Some(_)) => Value::Object(Default::default()),
            (None, None) => Value::Array(Vec::new()),
        };

        let documents = match collection.section() {
            None => documents_from(collection, Some(&file))?,
            Some(key) => {
                let object = file.as_object().ok_or_else(|| {
                    malformed(collection, "expected a JSON object at the top level")
                })?;
                documents_from(collection, object.get(key))?
            }
        };
        Ok((file, documents))
    }

    async fn store_file(
        &self,
        collection: Collection,
        mut file: Value,
        documents: Vec<Document>,
    ) -> Result<()> {
        match collection.section() {
            None => file = Value::Array(documents.into_iter().map(Value::Object).collect()),
            Some(key) => {
                let object = file.as_object_mut().ok_or_else(|| {
                    malformed(collection, "expected a JSON object at the top level")
                })?;
                match section_value(collection, documents) {
                    Some(value) => object.insert(key.to_string(), value),
                    None => object.remove(key),
                };
            }
        }
        self.write_file(&self.file_path(collection), &file).await
    }
}

async fn ensure_dir(root: &Path) -> Result<()> {
    if fs::metadata(root).await.is_err() {
        fs::create_dir_all(root).await.map_err(FolioError::Io)?;
    }
    Ok(())
}

fn malformed(collection: Collection, detail: &str) -> FolioError {
    FolioError::Store(format!(
        "Malformed {} in {}: {}",
        collection,
        collection.file_name(),
        detail
    ))
}

/// A section may hold `null`, one object, or an array of objects.
fn documents_from(collection: Collection, value: Option<&Value>) -> Result<Vec<Document>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(object)) => Ok(vec![with_section_id(collection, object.clone())]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_object()
                    .cloned()
                    .ok_or_else(|| malformed(collection, "expected an array of objects"))
            })
            .collect(),
        Some(_) => Err(malformed(collection, "unexpected JSON type")),
    }
}

/// A singleton section saved without an `id` is addressed by the collection
/// slug. The next write through this backend stores that id.
fn with_section_id(collection: Collection, mut object: Document) -> Document {
    if collection.is_singleton() && document_id(&object).is_none() {
        object.insert(
            "id".to_string(),
            Value::String(collection.slug().to_string()),
        );
    }
    object
}

/// Singleton sections are written as a bare object while they hold exactly one
/// record. If a caller created a second one, the section becomes an array so
/// nothing is dropped on disk.
fn section_value(collection: Collection, mut documents: Vec<Document>) -> Option<Value> {
    if collection.is_singleton() {
        match documents.len() {
            0 => None,
            1 => documents.pop().map(Value::Object),
            _ => Some(Value::Array(documents.into_iter().map(Value::Object).collect())),
        }
    } else {
        Some(Value::Array(
            documents.into_iter().map(Value::Object).collect(),
        ))
    }
}

#[async_trait]
impl StorageBackend for FsBackend {
    async fn load_all(&self, collection: Collection) -> Result<Vec<Document>> {
        let (_, documents) = self.load_file(collection).await?;
        Ok(documents)
    }

    async fn load(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        let (_, documents) = self.load_file(collection).await?;
        Ok(documents
            .into_iter()
            .find(|doc| document_id(doc) == Some(id)))
    }

    async fn put(&self, collection: Collection, document: Document) -> Result<()> {
        let id = document_id(&document)
            .ok_or_else(|| FolioError::Store("Document has no id".to_string()))?
            .to_string();

        let (file, mut documents) = self.load_file(collection).await?;
        match documents
            .iter()
            .position(|doc| document_id(doc) == Some(id.as_str()))
        {
            Some(index) => documents[index] = document,
            None => match collection.placement() {
                Placement::Prepend => documents.insert(0, document),
                Placement::Append => documents.push(document),
            },
        }
        self.store_file(collection, file, documents).await
    }

    async fn remove(&self, collection: Collection, id: &str) -> Result<bool> {
        let (file, mut documents) = self.load_file(collection).await?;
        let before = documents.len();
        documents.retain(|doc| document_id(doc) != Some(id));
        if documents.len() == before {
            return Ok(false);
        }
        self.store_file(collection, file, documents).await?;
        Ok(true)
    }

    fn describe(&self) -> String {
        format!("json:{}", self.root.display())
    }
}
