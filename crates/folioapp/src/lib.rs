//! # Folio Architecture
//!
//! Folio is the content core of a personal portfolio site: a **UI-agnostic
//! content repository**. The HTTP server and the CLI in the `folio` binary are
//! two clients of the same library.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Transport (folio binary: http/, cli/)                      │
//! │  - Auth gate, required-field validation, status codes       │
//! │  - The ONLY place that knows about HTTP or the terminal     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - One repository per content type                          │
//! │  - Aggregate, public (with fallbacks) and dashboard reads   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Repository Layer (repository.rs)                           │
//! │  - Repository<T>: ids, timestamps, shallow merge            │
//! │  - Singleton<T>: zero-or-one convention                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract StorageBackend trait over JSON documents        │
//! │  - FsBackend (JSON files), SqliteBackend, MemBackend        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code returns Rust types and [`error::FolioError`];
//! it never writes to stdout, never picks a status code and never exits the
//! process. Every error carries an [`error::ErrorKind`] that transports map
//! exhaustively.
//!
//! ## Testing Strategy
//!
//! 1. **Repository** (`repository.rs`): the CRUD contract, against
//!    `MemBackend` with a `ManualClock`.
//! 2. **Backends** (`store/*`): layout and ordering per backend; the shared
//!    contract runs against every backend in `tests/`.
//! 3. **API** (`api.rs`): aggregation, fallbacks and seeding.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade used by every client
//! - [`repository`]: Generic CRUD and the singleton variant
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Record envelope and content types
//! - [`validate`]: Required-field checks
//! - [`auth`]: Admin allowlist
//! - [`defaults`]: Built-in content for fallbacks and seeding
//! - [`clock`]: Injectable time source
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod defaults;
pub mod error;
pub mod model;
pub mod repository;
pub mod store;
pub mod validate;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
