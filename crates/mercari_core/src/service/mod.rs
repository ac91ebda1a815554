//! Catalog use-case services.
//!
//! # Responsibility
//! - Sequence image storage and catalog persistence into submission APIs.
//! - Keep outer layers (CLI, HTTP) decoupled from storage details.

pub mod catalog_service;
