//! Core catalog logic for the marketplace listing service.
//! This crate is the single source of truth for item/category invariants and
//! content-addressed image naming.

pub mod config;
pub mod db;
pub mod image;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::CatalogConfig;
pub use image::{content_file_name, ImageError, ImageResult, ImageStore};
pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::item::{Category, CategoryId, ItemId, ItemRecord, ItemValidationError, NewItem};
pub use repo::catalog_repo::{CatalogRepository, RepoError, RepoResult, SqliteCatalogRepository};
pub use service::catalog_service::{
    CatalogService, ServiceError, ServiceResult, SubmitItemReceipt, SubmitItemRequest,
};

/// Root greeting, kept for liveness probes.
pub fn ping() -> &'static str {
    "Hello, world!"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_greeting() {
        assert_eq!(ping(), "Hello, world!");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
