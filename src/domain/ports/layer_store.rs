//! LayerStore port - abstraction for layer and image persistence
//!
//! The store is a cache: everything in it can be re-derived from a build
//! context. Layers are addressed by [`CacheKey`], images by name.

use std::path::{Path, PathBuf};

use crate::domain::entities::{ImageRecord, LayerRecord};
use crate::domain::value_objects::CacheKey;
use crate::error::StrataError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation errors
#[derive(Debug)]
pub enum StoreError {
    /// No layer with this key
    LayerNotFound(CacheKey),
    /// A record exists but cannot be parsed
    Corrupted { path: PathBuf, message: String },
    /// I/O error
    Io(std::io::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::LayerNotFound(key) => write!(f, "Layer not found: {}", key.short()),
            StoreError::Corrupted { path, message } => {
                write!(f, "Corrupted record {}: {}", path.display(), message)
            }
            StoreError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<StoreError> for StrataError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::LayerNotFound(key) => StrataError::StoreCorrupted {
                path: PathBuf::from(key.as_str()),
                message: "layer not found".to_string(),
            },
            StoreError::Corrupted { path, message } => StrataError::StoreCorrupted { path, message },
            StoreError::Io(err) => StrataError::Io(err),
        }
    }
}

/// Lock modes for the whole store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Readers (`run`, `images`, `inspect`)
    Shared,
    /// Writers (`build`, `prune`)
    Exclusive,
}

/// A layer being produced by a running stage.
///
/// Dropping it without committing discards everything written to it.
pub trait PendingLayer {
    /// Directory the stage writes its files into
    fn root(&self) -> &Path;
}

/// Abstract layer store
///
/// Implementations:
/// - `FsLayerStore` - directories plus TOML records on local disk
pub trait LayerStore {
    /// Held lock; released on drop
    type Guard;
    type Pending: PendingLayer;

    /// Store location (for messages)
    fn location(&self) -> &Path;

    /// Take the store lock, blocking until it is available
    fn lock(&self, mode: LockMode) -> StoreResult<Self::Guard>;

    /// Whether a committed layer with this key exists
    fn contains(&self, key: &CacheKey) -> bool;

    /// Read a committed layer's record
    fn layer(&self, key: &CacheKey) -> StoreResult<LayerRecord>;

    /// Directory holding a committed layer's files
    fn layer_root(&self, key: &CacheKey) -> PathBuf;

    /// Keys of all committed layers, sorted
    fn layer_keys(&self) -> StoreResult<Vec<CacheKey>>;

    /// Start a new layer in a scratch location
    fn begin(&self) -> StoreResult<Self::Pending>;

    /// Scratch root for assembling an image to run.
    ///
    /// Never reported by [`LayerStore::abandoned_scratch`], since its process
    /// may still be running after the store lock is released.
    fn begin_run(&self) -> StoreResult<Self::Pending>;

    /// Atomically publish a pending layer under `record.key`, replacing any
    /// existing layer with that key
    fn commit(&self, pending: Self::Pending, record: &LayerRecord) -> StoreResult<()>;

    /// Delete a committed layer, returning the bytes freed
    fn remove_layer(&self, key: &CacheKey) -> StoreResult<u64>;

    /// Stage scratch directories left behind by interrupted builds
    fn abandoned_scratch(&self) -> StoreResult<Vec<PathBuf>>;

    /// Delete an abandoned scratch directory
    fn remove_scratch(&self, path: &Path) -> StoreResult<()>;

    /// Read an image record
    fn image(&self, name: &str) -> StoreResult<Option<ImageRecord>>;

    /// All image records, sorted by name
    fn images(&self) -> StoreResult<Vec<ImageRecord>>;

    /// Write (or replace) an image record
    fn save_image(&self, record: &ImageRecord) -> StoreResult<()>;
}
