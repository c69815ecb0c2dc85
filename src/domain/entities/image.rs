//! Image entity - the result of a successful build
//!
//! An image record is only written once every stage has committed, so its
//! presence means the whole pipeline succeeded.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CacheKey, ContentHash, StageKind};

/// Current record format version
pub const IMAGE_RECORD_VERSION: u32 = 1;

/// Reference from an image to one of its layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLayer {
    pub stage: StageKind,
    pub key: CacheKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub version: u32,
    pub name: String,
    pub base: String,
    pub workdir: String,
    pub entry: Vec<String>,
    #[serde(default)]
    pub packages: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub manifest: ContentHash,
    pub source: ContentHash,
    pub built_at: DateTime<Utc>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Layers in stage order
    pub layers: Vec<ImageLayer>,
}

impl ImageRecord {
    /// Key of the final layer; two images with the same top key are identical
    pub fn top_key(&self) -> Option<&CacheKey> {
        self.layers.last().map(|l| &l.key)
    }

    pub fn layer_for(&self, stage: StageKind) -> Option<&CacheKey> {
        self.layers.iter().find(|l| l.stage == stage).map(|l| &l.key)
    }

    pub fn layer_keys(&self) -> impl Iterator<Item = &CacheKey> {
        self.layers.iter().map(|l| &l.key)
    }
}
