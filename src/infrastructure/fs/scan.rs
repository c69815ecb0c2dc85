//! Build context scanning

use std::fs;
use std::path::Path;

use crate::domain::entities::{SourceFile, SourceTree};
use crate::domain::value_objects::IgnorePatterns;
use crate::error::{StrataError, StrataResult};

use super::local::{hash_file, is_executable};

/// Collect every non-ignored file of the build context.
///
/// Directory symlinks are skipped; file symlinks are read through.
pub fn scan_source(context: &Path, ignore: &IgnorePatterns) -> StrataResult<SourceTree> {
    let copy_failed = |path: &Path, source: std::io::Error| StrataError::SourceCopyFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    let mut pending = vec![context.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| copy_failed(&dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| copy_failed(&dir, e))?;
            let path = entry.path();
            let rel = match path.strip_prefix(context) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => continue,
            };

            let meta = fs::metadata(&path).map_err(|e| copy_failed(&path, e))?;
            let is_link = entry
                .file_type()
                .map(|t| t.is_symlink())
                .unwrap_or(false);

            if ignore.is_ignored(&rel, meta.is_dir()) {
                continue;
            }

            if meta.is_dir() {
                if is_link {
                    tracing::debug!(path = %rel.display(), "skipping directory symlink");
                } else {
                    pending.push(path);
                }
                continue;
            }

            if !meta.is_file() {
                continue;
            }

            files.push(SourceFile {
                rel_path: to_slash(&rel),
                hash: hash_file(&path).map_err(|e| copy_failed(&path, e))?,
                size: meta.len(),
                executable: is_executable(&meta),
            });
        }
    }

    tracing::debug!(files = files.len(), context = %context.display(), "scanned build context");
    Ok(SourceTree::new(context, files))
}

fn to_slash(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
