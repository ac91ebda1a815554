//! Catalog domain model.
//!
//! # Responsibility
//! - Define the item and category records used by store and service layers.
//! - Keep submission validation next to the data it guards.
//!
//! # Invariants
//! - Items reference categories by surrogate id in storage, by name when read.
//! - Records are immutable once persisted; there is no update path.

pub mod item;
