//! Listing submission and read service.
//!
//! # Responsibility
//! - Validate a submission, store its image (if any), then persist the item.
//! - Expose list/get/search/image-fetch reads for outer layers.
//!
//! # Invariants
//! - A rejected submission writes neither an image nor a database row.
//! - Service APIs never bypass repository validation/persistence contracts.

use crate::image::{ImageError, ImageStore};
use crate::model::item::{
    validate_category_name, validate_item_name, ItemId, ItemRecord, ItemValidationError, NewItem,
};
use crate::repo::catalog_repo::{CatalogRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ItemValidationError),
    Repo(RepoError),
    Image(ImageError),
}

impl ServiceError {
    /// Unknown item id or unknown image name.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Repo(err) => err.is_not_found(),
            Self::Image(err) => err.is_not_found(),
            Self::Validation(_) => false,
        }
    }

    /// Caller-side rejection; never worth retrying.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Repo(RepoError::Validation(_))
                | Self::Image(ImageError::EmptyContent)
        )
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Image(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Image(err) => Some(err),
        }
    }
}

impl From<ItemValidationError> for ServiceError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ImageError> for ServiceError {
    fn from(value: ImageError) -> Self {
        Self::Image(value)
    }
}

/// Submission decoded by an outer layer from form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitItemRequest {
    pub name: String,
    pub category: String,
    /// Raw upload bytes; `None` when no image was attached.
    pub image: Option<Vec<u8>>,
}

/// Acknowledgement returned for an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitItemReceipt {
    pub item_id: ItemId,
    pub name: String,
    pub image_name: Option<String>,
    /// `Item received: <name>`
    pub message: String,
}

/// Use-case service over a catalog repository and an image store.
pub struct CatalogService<R: CatalogRepository> {
    repo: R,
    images: ImageStore,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R, images: ImageStore) -> Self {
        Self { repo, images }
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Accepts one listing submission.
    ///
    /// # Contract
    /// - Name and category are checked before the image directory is touched.
    /// - Image (if any) is stored before the item row is inserted.
    /// - Returns the new item id plus the acknowledgement message.
    pub fn submit_item(&self, request: SubmitItemRequest) -> ServiceResult<SubmitItemReceipt> {
        validate_item_name(&request.name)?;
        validate_category_name(&request.category)?;

        let image_name = match request.image.as_deref() {
            Some(bytes) => Some(self.images.store(bytes)?),
            None => None,
        };

        let item = NewItem {
            name: request.name,
            category: request.category,
            image_name,
        };
        let item_id = self.repo.create_item(&item)?;

        Ok(SubmitItemReceipt {
            item_id,
            message: format!("Item received: {}", item.name),
            name: item.name,
            image_name: item.image_name,
        })
    }

    pub fn list_items(&self) -> ServiceResult<Vec<ItemRecord>> {
        Ok(self.repo.list_items()?)
    }

    /// Returns `NotFound` for ids that were never created.
    pub fn get_item(&self, id: ItemId) -> ServiceResult<ItemRecord> {
        Ok(self.repo.get_item(id)?)
    }

    pub fn search_items(&self, keyword: &str) -> ServiceResult<Vec<ItemRecord>> {
        Ok(self.repo.search_items(keyword)?)
    }

    /// Reads stored image bytes by content-addressed name.
    pub fn fetch_image(&self, image_name: &str) -> ServiceResult<Vec<u8>> {
        Ok(self.images.read(image_name)?)
    }

    /// Resolves an image name to its on-disk path, for streaming callers.
    pub fn image_path(&self, image_name: &str) -> ServiceResult<PathBuf> {
        Ok(self.images.path_of(image_name)?)
    }
}
