//! Command-line surface for the catalog.

use clap::{Parser, Subcommand};
use mercari_core::CatalogConfig;
use std::path::PathBuf;

/// Marketplace listing catalog: submit, list, fetch and search items.
#[derive(Parser, Debug)]
#[command(name = "mercari", version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides MERCARI_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Directory holding content-addressed images (overrides MERCARI_IMAGE_DIR)
    #[arg(long, global = true)]
    pub image_dir: Option<PathBuf>,

    /// Rolling log directory; logging stays off when neither this nor MERCARI_LOG_DIR is set
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides MERCARI_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Liveness probe
    Ping,
    /// Submit a new listing
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        /// Image file to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// List every item
    List,
    /// Show one item by id
    Get { id: i64 },
    /// Find items whose name or category contains KEYWORD
    Search { keyword: String },
    /// Fetch a stored image by file name
    Image {
        name: String,
        /// Write bytes here instead of printing the resolved path
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the resolved configuration
    Config,
}

impl Cli {
    /// Layers explicit flags over environment-derived settings.
    pub fn resolve_config(&self, base: CatalogConfig) -> CatalogConfig {
        CatalogConfig {
            db_path: self.db.clone().unwrap_or(base.db_path),
            image_dir: self.image_dir.clone().unwrap_or(base.image_dir),
            log_dir: self.log_dir.clone().or(base.log_dir),
            log_level: self.log_level.clone().unwrap_or(base.log_level),
            allowed_origins: base.allowed_origins,
        }
    }
}
