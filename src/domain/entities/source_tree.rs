//! Application source tree entity
//!
//! A snapshot of the files that will be copied into the image. The scan
//! itself lives in the infrastructure layer; this type only holds the result
//! and derives the tree digest from it.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::{ContentHash, InputDigest};

/// One file of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the build context, `/`-separated
    pub rel_path: String,
    pub hash: ContentHash,
    pub size: u64,
    pub executable: bool,
}

/// Files of the build context, sorted by relative path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTree {
    root: PathBuf,
    files: Vec<SourceFile>,
}

impl SourceTree {
    pub fn new(root: impl Into<PathBuf>, mut files: Vec<SourceFile>) -> Self {
        files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        files.dedup_by(|a, b| a.rel_path == b.rel_path);
        Self {
            root: root.into(),
            files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    pub fn contains(&self, rel_path: &str) -> bool {
        let wanted = rel_path.trim_start_matches("./");
        self.files
            .binary_search_by(|f| f.rel_path.as_str().cmp(wanted))
            .is_ok()
    }

    /// Digest over (path, content hash, executable bit) of every file.
    ///
    /// Timestamps and the context's absolute location do not participate,
    /// so the same tree checked out twice gets the same digest.
    pub fn digest(&self) -> ContentHash {
        let mut digest = InputDigest::new();
        for file in &self.files {
            digest.push("path", &file.rel_path);
            digest.push("hash", file.hash.as_str());
            digest.push("mode", if file.executable { "755" } else { "644" });
        }
        digest.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, content: &str) -> SourceFile {
        SourceFile {
            rel_path: path.to_string(),
            hash: ContentHash::from_content(content),
            size: content.len() as u64,
            executable: false,
        }
    }

    #[test]
    fn digest_ignores_discovery_order_and_root() {
        let a = SourceTree::new("/a", vec![file("bot.py", "x"), file("lib/util.py", "y")]);
        let b = SourceTree::new("/b", vec![file("lib/util.py", "y"), file("bot.py", "x")]);
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn digest_changes_with_content_and_mode() {
        let base = SourceTree::new("/a", vec![file("bot.py", "x")]);
        let edited = SourceTree::new("/a", vec![file("bot.py", "x2")]);
        let mut exec = file("bot.py", "x");
        exec.executable = true;
        let chmod = SourceTree::new("/a", vec![exec]);

        assert_ne!(base.digest(), edited.digest());
        assert_ne!(base.digest(), chmod.digest());
    }

    #[test]
    fn contains_accepts_dot_slash() {
        let tree = SourceTree::new("/a", vec![file("telegram_bot.py", "x")]);
        assert!(tree.contains("telegram_bot.py"));
        assert!(tree.contains("./telegram_bot.py"));
        assert!(!tree.contains("bot.py"));
        assert_eq!(tree.total_size(), 1);
    }
}
