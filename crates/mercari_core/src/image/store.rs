//! Filesystem-backed image store.
//!
//! # Invariants
//! - Identical bytes always map to the same file; the second store is a no-op.
//! - Writes land via temp file + rename, so readers never see partial content.

use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Fixed extension appended to every stored image name.
pub const IMAGE_EXTENSION: &str = "jpg";

static IMAGE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{64}\.jpg$").expect("image name pattern is valid"));

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub type ImageResult<T> = Result<T, ImageError>;

/// Image store error.
#[derive(Debug)]
pub enum ImageError {
    /// Upload carried zero bytes.
    EmptyContent,
    /// No stored image answers to this name.
    NotFound(String),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ImageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for ImageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "image content cannot be empty"),
            Self::NotFound(name) => write!(f, "image not found: {name}"),
            Self::Io { path, source } => write!(f, "image io failed at `{}`: {source}", path.display()),
        }
    }
}

impl Error for ImageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyContent | Self::NotFound(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Derives the content-addressed file name for `bytes`.
pub fn content_file_name(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}.{IMAGE_EXTENSION}", hasher.finalize())
}

/// Image directory handle. Owns the digest-to-path mapping.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Opens the store rooted at `dir`, creating the directory if missing.
    pub fn open(dir: impl Into<PathBuf>) -> ImageResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|err| ImageError::io(&dir, err))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persists `bytes` and returns their content-addressed file name.
    ///
    /// # Errors
    /// - `EmptyContent` for zero-length input; nothing is written.
    /// - `Io` when the directory cannot be written.
    pub fn store(&self, bytes: &[u8]) -> ImageResult<String> {
        if bytes.is_empty() {
            return Err(ImageError::EmptyContent);
        }

        let started_at = Instant::now();
        let file_name = content_file_name(bytes);
        let target = self.dir.join(&file_name);

        if target.is_file() {
            info!(
                "event=image_store module=image status=ok reused=true size_bytes={} duration_ms={}",
                bytes.len(),
                started_at.elapsed().as_millis()
            );
            return Ok(file_name);
        }

        if let Err(err) = self.write_atomically(&target, &file_name, bytes) {
            error!(
                "event=image_store module=image status=error size_bytes={} duration_ms={} error={}",
                bytes.len(),
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }

        info!(
            "event=image_store module=image status=ok reused=false size_bytes={} duration_ms={}",
            bytes.len(),
            started_at.elapsed().as_millis()
        );
        Ok(file_name)
    }

    /// Returns whether a stored image answers to `name`.
    pub fn contains(&self, name: &str) -> bool {
        is_stored_name(name) && self.dir.join(name).is_file()
    }

    /// Resolves `name` to a path inside the image directory.
    ///
    /// Names that could not have come from [`ImageStore::store`] are reported
    /// as not found rather than touching the filesystem.
    pub fn path_of(&self, name: &str) -> ImageResult<PathBuf> {
        if !self.contains(name) {
            return Err(ImageError::NotFound(name.to_string()));
        }
        Ok(self.dir.join(name))
    }

    /// Reads stored bytes for `name`.
    pub fn read(&self, name: &str) -> ImageResult<Vec<u8>> {
        if !is_stored_name(name) {
            return Err(ImageError::NotFound(name.to_string()));
        }

        let path = self.dir.join(name);
        match std::fs::read(&path) {
            Ok(bytes) => {
                info!(
                    "event=image_fetch module=image status=ok size_bytes={}",
                    bytes.len()
                );
                Ok(bytes)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=image_fetch module=image status=not_found");
                Err(ImageError::NotFound(name.to_string()))
            }
            Err(err) => Err(ImageError::io(&path, err)),
        }
    }

    fn write_atomically(&self, target: &Path, file_name: &str, bytes: &[u8]) -> ImageResult<()> {
        let temp = self.dir.join(format!(
            ".{file_name}.{}.{}.tmp",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        write_via_temp(&temp, target, bytes)
    }
}

/// Writes `bytes` to `temp` then renames onto `target`.
///
/// `temp` never outlives a failed call.
fn write_via_temp(temp: &Path, target: &Path, bytes: &[u8]) -> ImageResult<()> {
    if let Err(err) = std::fs::write(temp, bytes) {
        let _ = std::fs::remove_file(temp);
        return Err(ImageError::io(temp, err));
    }
    if let Err(err) = std::fs::rename(temp, target) {
        let _ = std::fs::remove_file(temp);
        return Err(ImageError::io(target, err));
    }
    Ok(())
}

fn is_stored_name(name: &str) -> bool {
    IMAGE_NAME_PATTERN.is_match(name)
}
