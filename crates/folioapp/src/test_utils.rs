use crate::api::FolioApi;
use crate::clock::ManualClock;
use crate::store::fs_backend::FsBackend;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestEnv {
    // Keeps the directory alive until the test is done
    pub _temp_dir: TempDir,
    pub backend: Arc<FsBackend>,
    pub clock: Arc<ManualClock>,
    pub api: FolioApi,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let backend = Arc::new(FsBackend::new(&root));
        let start = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        let clock = Arc::new(ManualClock::at(start));
        let api = FolioApi::new(backend.clone(), clock.clone(), None);
        Self {
            _temp_dir: temp_dir,
            backend,
            clock,
            api,
            root,
        }
    }

    pub fn read_json(&self, file: &str) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.root.join(file)).expect("file exists");
        serde_json::from_str(&raw).expect("file holds JSON")
    }
}
