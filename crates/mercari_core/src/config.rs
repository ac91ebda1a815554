//! Environment-driven catalog settings.
//!
//! # Responsibility
//! - Resolve database location, image directory, origin allow-list and log
//!   settings from environment variables with stable defaults.
//!
//! # Invariants
//! - Missing or blank variables fall back to defaults; loading never fails.
//! - `allowed_origins` is carried for outer layers only; core ignores it.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "MERCARI_DB_PATH";
pub const ENV_IMAGE_DIR: &str = "MERCARI_IMAGE_DIR";
pub const ENV_FRONT_URL: &str = "FRONT_URL";
pub const ENV_LOG_DIR: &str = "MERCARI_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "MERCARI_LOG_LEVEL";

pub const DEFAULT_DB_PATH: &str = "db/mercari.sqlite3";
pub const DEFAULT_IMAGE_DIR: &str = "images";
pub const DEFAULT_FRONT_URL: &str = "http://localhost:3000";

/// Resolved catalog settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub db_path: PathBuf,
    pub image_dir: PathBuf,
    pub allowed_origins: Vec<String>,
    /// Rolling log directory; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl CatalogConfig {
    /// Loads settings from process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: get(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            image_dir: get(ENV_IMAGE_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR)),
            allowed_origins: parse_origins(
                get(ENV_FRONT_URL).as_deref().unwrap_or(DEFAULT_FRONT_URL),
            ),
            log_dir: get(ENV_LOG_DIR).map(PathBuf::from),
            log_level: get(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
