//! Prune result types

use std::path::PathBuf;

use crate::domain::value_objects::CacheKey;

/// Result of a prune operation
#[derive(Debug, Clone, Default)]
pub struct PruneResult {
    /// Unreferenced layers removed (or that would be removed in dry run)
    pub layers: Vec<CacheKey>,
    /// Abandoned scratch directories
    pub scratch: Vec<PathBuf>,
    /// Layers still referenced by at least one image
    pub kept: usize,
    pub bytes_freed: u64,
    pub dry_run: bool,
}

impl PruneResult {
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.scratch.is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.layers.len() + self.scratch.len()
    }
}
