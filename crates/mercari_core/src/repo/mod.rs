//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the catalog store contract used by the service layer.
//! - Isolate SQLite query details from submission orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `NewItem::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod catalog_repo;
