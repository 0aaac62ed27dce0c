//! # Folio CLI
//!
//! `args.rs` defines the clap interface, `handlers.rs` runs one subcommand
//! against the API, and `render.rs` turns results into terminal text. This
//! module wires them together: parse, set up logging, resolve configuration,
//! open the backend, dispatch.

mod args;
mod handlers;
mod render;

use anyhow::{Context, Result};
use args::{Cli, Commands, ConfigAction};
use clap::Parser;
use folioapp::api::FolioApi;
use folioapp::clock::SystemClock;
use folioapp::config::FolioConfig;
use folioapp::store::open_backend;
use handlers::AppContext;
use std::sync::Arc;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = FolioConfig::load(cli.data_dir.as_deref())?;
    if let Some(backend) = cli.backend {
        config.backend = backend.to_string();
    }

    if let Commands::Config { action } = &cli.command {
        return handlers::config(&config, action.unwrap_or(ConfigAction::Show));
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(dispatch(cli.command, config))
}

async fn dispatch(command: Commands, config: FolioConfig) -> Result<()> {
    let ctx = context(config)?;
    match command {
        Commands::Serve { bind } => handlers::serve(ctx, bind).await,
        Commands::List { collection, json } => handlers::list(&ctx, collection, json).await,
        Commands::Show { collection, id } => handlers::show(&ctx, collection, &id).await,
        Commands::Delete { collection, id } => handlers::delete(&ctx, collection, &id).await,
        Commands::Portfolio { public } => handlers::portfolio(&ctx, public).await,
        Commands::Stats => handlers::stats(&ctx).await,
        Commands::Seed { force } => handlers::seed(&ctx, force).await,
        Commands::Config { action } => {
            handlers::config(&ctx.config, action.unwrap_or(ConfigAction::Show))
        }
    }
}

fn context(config: FolioConfig) -> Result<AppContext> {
    let kind = config.backend_kind()?;
    let data_dir = config.data_dir();
    let backend = open_backend(kind, &data_dir)
        .with_context(|| format!("failed to open {} store in {}", kind, data_dir.display()))?;
    let api = FolioApi::new(backend, Arc::new(SystemClock), config.backend_timeout());
    Ok(AppContext { config, api })
}

/// `RUST_LOG` wins; otherwise `-v` raises the level from warn.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn,folio=info,folioapp=info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
