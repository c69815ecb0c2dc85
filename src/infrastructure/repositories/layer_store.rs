//! Filesystem Layer Store
//!
//! Layout under the store root:
//!
//! ```text
//! store.lock
//! layers/<key>/layer.toml
//! layers/<key>/root/
//! images/<name>.toml
//! tmp/
//! ```
//!
//! A stage writes into a scratch directory under `tmp/`; committing renames
//! it into `layers/`, so a layer directory is either complete or absent.

use std::fs;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::TempDir;

use crate::config::sanitize_image_name;
use crate::domain::entities::{ImageRecord, LayerRecord};
use crate::domain::ports::{LayerStore, LockMode, PendingLayer, StoreError, StoreResult};
use crate::domain::value_objects::CacheKey;
use crate::infrastructure::fs::{atomic_write, tree_stats};

const LAYER_RECORD: &str = "layer.toml";
const LAYER_ROOT: &str = "root";
const STAGE_PREFIX: &str = "stage-";
const RUN_PREFIX: &str = "run-";

/// Held store lock; unlocked when dropped
pub struct StoreLock {
    file: fs::File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Scratch directory of a running stage
pub struct FsPendingLayer {
    dir: TempDir,
    root: PathBuf,
}

impl PendingLayer for FsPendingLayer {
    fn root(&self) -> &Path {
        &self.root
    }
}

/// Layer store on local disk
#[derive(Debug, Clone)]
pub struct FsLayerStore {
    root: PathBuf,
}

impl FsLayerStore {
    /// Open (and create if needed) a store at `root`
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self { root: root.into() };
        fs::create_dir_all(store.layers_dir())?;
        fs::create_dir_all(store.images_dir())?;
        fs::create_dir_all(store.tmp_dir())?;
        Ok(store)
    }

    fn layers_dir(&self) -> PathBuf {
        self.root.join("layers")
    }

    fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    fn tmp_dir(&self) -> PathBuf {
        self.root.join("tmp")
    }

    fn lock_path(&self) -> PathBuf {
        self.root.join("store.lock")
    }

    fn layer_dir(&self, key: &CacheKey) -> PathBuf {
        self.layers_dir().join(key.as_str())
    }

    fn image_path(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || sanitize_image_name(name) != name {
            return None;
        }
        Some(self.images_dir().join(format!("{}.toml", name)))
    }

    fn scratch(&self, prefix: &str) -> StoreResult<FsPendingLayer> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(self.tmp_dir())?;
        let root = dir.path().join(LAYER_ROOT);
        fs::create_dir_all(&root)?;
        Ok(FsPendingLayer { dir, root })
    }

    fn read_image(&self, path: &Path) -> StoreResult<ImageRecord> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| StoreError::Corrupted {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl LayerStore for FsLayerStore {
    type Guard = StoreLock;
    type Pending = FsPendingLayer;

    fn location(&self) -> &Path {
        &self.root
    }

    fn lock(&self, mode: LockMode) -> StoreResult<StoreLock> {
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        match mode {
            LockMode::Shared => FileExt::lock_shared(&file)?,
            LockMode::Exclusive => FileExt::lock_exclusive(&file)?,
        }
        tracing::debug!(?mode, store = %self.root.display(), "store locked");
        Ok(StoreLock { file })
    }

    fn contains(&self, key: &CacheKey) -> bool {
        self.layer_dir(key).join(LAYER_RECORD).is_file()
    }

    fn layer(&self, key: &CacheKey) -> StoreResult<LayerRecord> {
        let path = self.layer_dir(key).join(LAYER_RECORD);
        if !path.is_file() {
            return Err(StoreError::LayerNotFound(key.clone()));
        }
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| StoreError::Corrupted {
            path,
            message: e.to_string(),
        })
    }

    fn layer_root(&self, key: &CacheKey) -> PathBuf {
        self.layer_dir(key).join(LAYER_ROOT)
    }

    fn layer_keys(&self) -> StoreResult<Vec<CacheKey>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(self.layers_dir())? {
            let entry = entry?;
            let name = entry.file_name();
            match CacheKey::parse(&name.to_string_lossy()) {
                Some(key) => keys.push(key),
                None => tracing::debug!(entry = ?name, "ignoring foreign entry in layers/"),
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn begin(&self) -> StoreResult<FsPendingLayer> {
        self.scratch(STAGE_PREFIX)
    }

    fn begin_run(&self) -> StoreResult<FsPendingLayer> {
        self.scratch(RUN_PREFIX)
    }

    fn commit(&self, pending: FsPendingLayer, record: &LayerRecord) -> StoreResult<()> {
        let content = toml::to_string_pretty(record).map_err(|e| StoreError::Corrupted {
            path: pending.dir.path().join(LAYER_RECORD),
            message: e.to_string(),
        })?;
        atomic_write(&pending.dir.path().join(LAYER_RECORD), content.as_bytes())?;

        let target = self.layer_dir(&record.key);
        if target.exists() {
            fs::remove_dir_all(&target)?;
        }
        fs::rename(pending.dir.path(), &target)?;
        tracing::debug!(key = %record.key.short(), stage = %record.stage, "layer committed");
        // `pending.dir` now points at a moved directory; dropping it is a no-op
        drop(pending);
        Ok(())
    }

    fn remove_layer(&self, key: &CacheKey) -> StoreResult<u64> {
        let dir = self.layer_dir(key);
        if !dir.exists() {
            return Ok(0);
        }
        let (_, bytes) = tree_stats(&dir)?;
        fs::remove_dir_all(&dir)?;
        Ok(bytes)
    }

    fn abandoned_scratch(&self) -> StoreResult<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        for entry in fs::read_dir(self.tmp_dir())? {
            let entry = entry?;
            if entry.file_name().to_string_lossy().starts_with(STAGE_PREFIX) {
                dirs.push(entry.path());
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    fn remove_scratch(&self, path: &Path) -> StoreResult<()> {
        if !path.starts_with(self.tmp_dir()) {
            return Err(StoreError::Corrupted {
                path: path.to_path_buf(),
                message: "not a scratch directory of this store".to_string(),
            });
        }
        if path.is_dir() {
            fs::remove_dir_all(path)?;
        } else if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn image(&self, name: &str) -> StoreResult<Option<ImageRecord>> {
        match self.image_path(name) {
            Some(path) if path.is_file() => self.read_image(&path).map(Some),
            _ => Ok(None),
        }
    }

    fn images(&self) -> StoreResult<Vec<ImageRecord>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(self.images_dir())? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|path| self.read_image(path)).collect()
    }

    fn save_image(&self, record: &ImageRecord) -> StoreResult<()> {
        let path = self.image_path(&record.name).ok_or_else(|| StoreError::Corrupted {
            path: self.images_dir().join(&record.name),
            message: "invalid image name".to_string(),
        })?;
        let content = toml::to_string_pretty(record).map_err(|e| StoreError::Corrupted {
            path: path.clone(),
            message: e.to_string(),
        })?;
        atomic_write(&path, content.as_bytes())?;
        Ok(())
    }
}
