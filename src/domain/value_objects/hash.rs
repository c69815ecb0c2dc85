//! Content Hash and Cache Key Value Objects
//!
//! `ContentHash` identifies the bytes of one input (a manifest, a file).
//! `CacheKey` identifies a layer: the hash of a stage's inputs chained with
//! the key of the stage before it.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::StageKind;

/// Content hash value object
///
/// Wraps a SHA-256 hash string with the `sha256:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Prefix for SHA-256 hashes
    pub const PREFIX: &'static str = "sha256:";

    /// Create a new ContentHash from a raw hash string (with or without prefix)
    pub fn new(raw_hash: &str) -> Self {
        if raw_hash.starts_with(Self::PREFIX) {
            Self(raw_hash.to_string())
        } else {
            Self(format!("{}{}", Self::PREFIX, raw_hash))
        }
    }

    /// Create a ContentHash by computing SHA-256 of bytes
    pub fn from_bytes(content: &[u8]) -> Self {
        let hash = Sha256::digest(content);
        Self(format!("{}{:x}", Self::PREFIX, hash))
    }

    /// Create a ContentHash by computing SHA-256 of a string
    pub fn from_content(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Get the full hash string with prefix
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get just the hex part without prefix
    pub fn hex(&self) -> &str {
        self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ContentHash {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

/// Identity of one cached layer.
///
/// Stored as 64 lowercase hex characters (no prefix); doubles as the
/// layer's directory name in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CacheKey(String);

impl CacheKey {
    /// Domain separator mixed into every key; bump to invalidate all caches
    pub const DOMAIN: &'static str = "strata/v1";

    /// Derive the key of `stage` from its parent key and its input digest.
    pub fn derive(parent: Option<&CacheKey>, stage: StageKind, input: &ContentHash) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(Self::DOMAIN.as_bytes());
        hasher.update([0u8]);
        hasher.update(parent.map(|p| p.as_str()).unwrap_or("").as_bytes());
        hasher.update([0u8]);
        hasher.update(stage.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(input.as_str().as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Parse a stored key, rejecting anything that is not 64 hex chars
    pub fn parse(s: &str) -> Option<Self> {
        let valid = s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        valid.then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex characters, for display
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CacheKey {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| format!("invalid cache key '{}'", s))
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

/// Incremental digest over a sequence of labelled fields.
///
/// Each field is length-prefixed so `["ab", "c"]` and `["a", "bc"]` never
/// collide.
#[derive(Default)]
pub struct InputDigest {
    hasher: Sha256,
}

impl InputDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, label: &str, value: &str) -> Self {
        self.push(label, value);
        self
    }

    pub fn push(&mut self, label: &str, value: &str) {
        for part in [label, value] {
            self.hasher.update((part.len() as u64).to_le_bytes());
            self.hasher.update(part.as_bytes());
        }
    }

    pub fn finish(self) -> ContentHash {
        ContentHash::new(&format!("{:x}", self.hasher.finalize()))
    }
}
