//! Item and category records.
//!
//! # Responsibility
//! - Define submission input (`NewItem`) and read projections (`ItemRecord`).
//! - Validate submissions before any storage mutation.
//!
//! # Invariants
//! - `name` of a valid `NewItem` is non-blank; `category` is non-empty.
//! - `ItemRecord::category` is the category display name, never its id.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Surrogate id generated by storage on item insertion.
pub type ItemId = i64;

/// Surrogate id generated by storage on first use of a category name.
pub type CategoryId = i64;

/// De-duplicated category row. `name` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Listing submission accepted by the catalog store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    /// Category display name; resolved to an id at insertion time.
    pub category: String,
    /// Content-addressed file name returned by the image store, if any.
    pub image_name: Option<String>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            image_name: None,
        }
    }

    /// Attaches a stored image file name.
    pub fn with_image(mut self, image_name: impl Into<String>) -> Self {
        self.image_name = Some(image_name.into());
        self
    }

    /// Validates submission-level invariants.
    ///
    /// The item name is checked after trimming; all values are stored as given.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_item_name(&self.name)?;
        validate_category_name(&self.category)?;
        if matches!(self.image_name.as_deref(), Some(image) if image.trim().is_empty()) {
            return Err(ItemValidationError::EmptyImageName);
        }
        Ok(())
    }
}

/// Item joined with its category display name.
///
/// Serialized shape matches the listing API payload:
/// `{"id", "name", "category", "image_name"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub image_name: Option<String>,
}

/// Validation failures for catalog submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyName,
    EmptyCategory,
    EmptyImageName,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "item name cannot be empty"),
            Self::EmptyCategory => write!(f, "category name cannot be empty"),
            Self::EmptyImageName => write!(f, "image name cannot be empty when present"),
        }
    }
}

impl Error for ItemValidationError {}

pub(crate) fn validate_item_name(name: &str) -> Result<(), ItemValidationError> {
    if name.trim().is_empty() {
        return Err(ItemValidationError::EmptyName);
    }
    Ok(())
}

/// Categories match by exact string, so only the empty name is refused.
pub(crate) fn validate_category_name(name: &str) -> Result<(), ItemValidationError> {
    if name.is_empty() {
        return Err(ItemValidationError::EmptyCategory);
    }
    Ok(())
}
