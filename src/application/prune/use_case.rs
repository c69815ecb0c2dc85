//! Prune Use Case

use std::collections::HashSet;

use crate::domain::ports::{LayerStore, LockMode};
use crate::domain::value_objects::CacheKey;
use crate::error::StrataResult;
use crate::infrastructure::fs::tree_stats;

use super::options::PruneOptions;
use super::result::PruneResult;

/// Prune use case - garbage-collects the layer store
pub struct PruneUseCase<S>
where
    S: LayerStore,
{
    store: S,
}

impl<S> PruneUseCase<S>
where
    S: LayerStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Runs under the exclusive lock, so no build is writing scratch roots
    /// and every entry under the scratch area is abandoned.
    pub fn execute(&self, options: &PruneOptions) -> StrataResult<PruneResult> {
        let _lock = self.store.lock(LockMode::Exclusive)?;

        // An unreadable image record aborts here instead of freeing its layers
        let referenced: HashSet<CacheKey> = self
            .store
            .images()?
            .iter()
            .flat_map(|image| image.layer_keys().cloned())
            .collect();

        let mut result = PruneResult {
            dry_run: options.dry_run,
            ..Default::default()
        };

        for key in self.store.layer_keys()? {
            if referenced.contains(&key) {
                result.kept += 1;
                continue;
            }
            let bytes = if options.dry_run {
                tree_stats(&self.store.layer_root(&key))
                    .map(|(_, bytes)| bytes)
                    .unwrap_or(0)
            } else {
                self.store.remove_layer(&key)?
            };
            tracing::debug!(key = %key.short(), bytes, dry_run = options.dry_run, "unreferenced layer");
            result.bytes_freed += bytes;
            result.layers.push(key);
        }

        for path in self.store.abandoned_scratch()? {
            if !options.dry_run {
                let bytes = tree_stats(&path).map(|(_, bytes)| bytes).unwrap_or(0);
                self.store.remove_scratch(&path)?;
                result.bytes_freed += bytes;
            }
            result.scratch.push(path);
        }

        tracing::info!(
            layers = result.layers.len(),
            scratch = result.scratch.len(),
            kept = result.kept,
            "prune finished"
        );
        Ok(result)
    }
}
