//! # Folio
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, the HTTP
//! transport in `src/http/`, and this file only invokes `cli::run()` and
//! handles process termination. Everything about content lives in the
//! `folioapp` library.
//!
//! ```text
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │  CLI (src/cli/)          │   │  HTTP (src/http/)        │
//! │  clap, terminal output   │   │  axum, admin gate        │
//! └────────────┬─────────────┘   └────────────┬─────────────┘
//!              └──────────────┬───────────────┘
//!                             ▼
//!               ┌──────────────────────────┐
//!               │  folioapp::api::FolioApi │
//!               └──────────────────────────┘
//! ```
//!
//! `folio serve` runs the server; the other subcommands read and edit the
//! same store directly, which is handy for scripting and for inspecting a
//! deployment's data directory.

mod cli;
mod http;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
