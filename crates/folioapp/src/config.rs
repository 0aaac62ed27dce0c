//! # Configuration
//!
//! Folio configuration is loaded with [`confique`], layered from TOML files and
//! environment variables.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Command-line flags**: `--data-dir`, `--backend` (applied by the binary).
//! 2. **Environment variables**: `FOLIO_DATA_DIR`, `FOLIO_BACKEND`, ...
//! 3. **Data-dir Config**: `<data_dir>/folio.toml`.
//! 4. **Global Config**: OS-appropriate config directory (via `directories` crate).
//! 5. **Compiled Defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | `data` | Directory holding the JSON files or SQLite database |
//! | `backend` | `json` | `json`, `sqlite` or `memory` |
//! | `bind` | `127.0.0.1:3000` | Address the HTTP server listens on |
//! | `admin_emails` | `[]` | Identities allowed to edit content |
//! | `identity_header` | `x-admin-email` | Request header carrying the identity |
//! | `backend_timeout_ms` | unset | Upper bound per storage round trip |

use crate::error::{FolioError, Result};
use crate::store::BackendKind;
use confique::Config;
use directories::ProjectDirs;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "folio.toml";
pub const DEFAULT_DATA_DIR: &str = "data";
const ENV_DATA_DIR: &str = "FOLIO_DATA_DIR";

#[derive(Config, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FolioConfig {
    /// Directory holding the content files or database.
    #[config(env = "FOLIO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Storage backend: "json", "sqlite" or "memory".
    #[config(env = "FOLIO_BACKEND", default = "json")]
    pub backend: String,

    /// Address the HTTP server binds to.
    #[config(env = "FOLIO_BIND", default = "127.0.0.1:3000")]
    pub bind: String,

    /// Identities allowed to edit content. Compared case-insensitively.
    #[config(
        env = "FOLIO_ADMIN_EMAILS",
        parse_env = confique::env::parse::list_by_comma,
        default = []
    )]
    pub admin_emails: Vec<String>,

    /// Request header set by the fronting authenticator.
    #[config(env = "FOLIO_IDENTITY_HEADER", default = "x-admin-email")]
    pub identity_header: String,

    /// Milliseconds before a storage call is abandoned. Unset means no limit.
    #[config(env = "FOLIO_BACKEND_TIMEOUT_MS")]
    pub backend_timeout_ms: Option<u64>,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            backend: BackendKind::Json.to_string(),
            bind: "127.0.0.1:3000".to_string(),
            admin_emails: Vec::new(),
            identity_header: "x-admin-email".to_string(),
            backend_timeout_ms: None,
        }
    }
}

impl FolioConfig {
    /// Load every layer. `data_dir` (from the command line) decides which
    /// `folio.toml` is read and wins over any configured value.
    pub fn load(data_dir: Option<&Path>) -> Result<Self> {
        let local_dir = data_dir
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(ENV_DATA_DIR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let mut builder = Self::builder().env().file(local_dir.join(CONFIG_FILE));
        if let Some(global) = global_config_path() {
            builder = builder.file(global);
        }
        let mut config = builder
            .load()
            .map_err(|e| FolioError::Config(e.to_string()))?;

        if let Some(dir) = data_dir {
            config.data_dir = Some(dir.to_path_buf());
        }
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Load a single file over the defaults, ignoring the environment.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder()
            .file(path.as_ref())
            .load()
            .map_err(|e| FolioError::Config(e.to_string()))
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    pub fn backend_kind(&self) -> Result<BackendKind> {
        self.backend.parse()
    }

    pub fn backend_timeout(&self) -> Option<Duration> {
        self.backend_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// A commented `folio.toml` listing every key with its default.
    pub fn template() -> String {
        confique::toml::template::<FolioConfig>(confique::toml::FormatOptions::default())
    }
}

pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "folio").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
