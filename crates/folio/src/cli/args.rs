use clap::{Parser, Subcommand};
use folioapp::store::{BackendKind, Collection};
use std::path::PathBuf;

fn parse_collection(raw: &str) -> Result<Collection, String> {
    raw.parse().map_err(|_| {
        let known: Vec<_> = Collection::ALL.iter().map(|c| c.slug()).collect();
        format!("unknown collection '{raw}' (expected one of: {})", known.join(", "))
    })
}

fn parse_backend(raw: &str) -> Result<BackendKind, String> {
    raw.parse().map_err(|e: folioapp::error::FolioError| e.to_string())
}

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Portfolio site content server and admin tool", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the content files or database
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Storage backend: json, sqlite or memory
    #[arg(long, global = true, value_parser = parse_backend)]
    pub backend: Option<BackendKind>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// List the records of a collection
    #[command(alias = "ls")]
    List {
        #[arg(value_parser = parse_collection)]
        collection: Collection,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one record as JSON
    #[command(alias = "v")]
    Show {
        #[arg(value_parser = parse_collection)]
        collection: Collection,
        id: String,
    },

    /// Delete one record
    #[command(alias = "rm")]
    Delete {
        #[arg(value_parser = parse_collection)]
        collection: Collection,
        id: String,
    },

    /// Print every section as one JSON document
    Portfolio {
        /// Apply built-in fallbacks like the public site does
        #[arg(long)]
        public: bool,
    },

    /// Show dashboard counts
    Stats,

    /// Fill empty collections with built-in content
    Seed {
        /// Also overwrite singleton sections that already exist
        #[arg(long)]
        force: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Effective values after every layer is applied
    Show,
    /// A commented folio.toml with every key
    Template,
    /// Where configuration files are looked up
    Path,
}
