//! Layer entity - one committed, cacheable stage result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CacheKey, ContentHash, StageKind};

/// Metadata stored next to a layer's files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub key: CacheKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<CacheKey>,
    pub stage: StageKind,
    /// Digest of the stage's own inputs (before chaining with the parent)
    pub input: ContentHash,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub file_count: u64,
    #[serde(default)]
    pub total_bytes: u64,
}

impl LayerRecord {
    pub fn new(
        key: CacheKey,
        parent: Option<CacheKey>,
        stage: StageKind,
        input: ContentHash,
    ) -> Self {
        Self {
            key,
            parent,
            stage,
            input,
            created_at: Utc::now(),
            file_count: 0,
            total_bytes: 0,
        }
    }

    pub fn with_contents(mut self, file_count: u64, total_bytes: u64) -> Self {
        self.file_count = file_count;
        self.total_bytes = total_bytes;
        self
    }
}
