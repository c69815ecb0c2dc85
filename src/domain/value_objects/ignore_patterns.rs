//! Source ignore rules
//!
//! Decides which context paths the stage-source layer leaves out, and with
//! them out of the source digest: whatever the recipe's ignore file matches
//! (gitignore syntax), plus directories strata itself owns, such as a layer
//! store kept inside the context.

use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{StrataError, StrataResult};

#[derive(Debug)]
pub struct IgnorePatterns {
    matcher: Gitignore,
    /// Context-relative directories skipped whatever the ignore file says
    excluded: Vec<PathBuf>,
}

impl IgnorePatterns {
    /// Ignore nothing
    pub fn none() -> Self {
        Self {
            matcher: Gitignore::empty(),
            excluded: Vec::new(),
        }
    }

    /// Read the recipe's ignore file from `context`. A missing file ignores
    /// nothing.
    pub fn load(context: &Path, ignore_file: &str) -> StrataResult<Self> {
        let path = context.join(ignore_file);
        let invalid = |e: ignore::Error| StrataError::InvalidConfig {
            file: path.clone(),
            message: e.to_string(),
        };

        let mut builder = GitignoreBuilder::new(context);
        if path.is_file() {
            if let Some(err) = builder.add(&path) {
                return Err(invalid(err));
            }
        }
        Ok(Self {
            matcher: builder.build().map_err(invalid)?,
            excluded: Vec::new(),
        })
    }

    /// Also skip `dir` (and everything below it) when it lies inside
    /// `context`. Directories elsewhere are never scanned anyway.
    pub fn excluding(mut self, context: &Path, dir: &Path) -> Self {
        if let Some(rel) = relative_dir(context, dir) {
            self.excluded.push(rel);
        }
        self
    }

    /// Whether a context-relative path stays out of the source layer
    pub fn is_ignored(&self, rel_path: &Path, is_dir: bool) -> bool {
        self.excluded.iter().any(|dir| rel_path.starts_with(dir))
            || self
                .matcher
                .matched_path_or_any_parents(rel_path, is_dir)
                .is_ignore()
    }
}

fn relative_dir(context: &Path, dir: &Path) -> Option<PathBuf> {
    let context = context.canonicalize().ok()?;
    let dir = dir.canonicalize().ok()?;
    let rel = dir.strip_prefix(&context).ok()?;
    // The context itself is never excluded wholesale
    (!rel.as_os_str().is_empty()).then(|| rel.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn load(content: &str) -> (tempfile::TempDir, IgnorePatterns) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".strataignore"), content).unwrap();
        let patterns = IgnorePatterns::load(dir.path(), ".strataignore").unwrap();
        (dir, patterns)
    }

    #[test]
    fn missing_file_ignores_nothing() {
        let dir = tempdir().unwrap();
        let patterns = IgnorePatterns::load(dir.path(), ".strataignore").unwrap();
        assert!(!patterns.is_ignored(Path::new("telegram_bot.py"), false));
        assert!(!patterns.is_ignored(Path::new("__pycache__"), true));
    }

    #[test]
    fn bot_caches_and_local_state_are_ignored() {
        let (_dir, patterns) = load("# local only\n__pycache__/\n.venv/\n*.db\n!seed.db\n");
        assert!(patterns.is_ignored(Path::new("pkg/__pycache__/mod.pyc"), false));
        assert!(patterns.is_ignored(Path::new(".venv/bin/python"), false));
        assert!(patterns.is_ignored(Path::new("fallback_bot.db"), false));
        assert!(!patterns.is_ignored(Path::new("seed.db"), false));
        assert!(!patterns.is_ignored(Path::new("telegram_bot.py"), false));
    }

    #[test]
    fn recipe_can_name_another_ignore_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".dockerignore"), "secrets.env\n").unwrap();
        let patterns = IgnorePatterns::load(dir.path(), ".dockerignore").unwrap();
        assert!(patterns.is_ignored(Path::new("secrets.env"), false));
    }

    #[test]
    fn store_inside_context_is_excluded_even_when_re_included() {
        let (dir, patterns) = load("!.strata/\n");
        fs::create_dir_all(dir.path().join(".strata/tmp/stage-1")).unwrap();
        let patterns = patterns.excluding(dir.path(), &dir.path().join(".strata"));

        assert!(patterns.is_ignored(Path::new(".strata"), true));
        assert!(patterns.is_ignored(Path::new(".strata/tmp/stage-1/root/app/bot.py"), false));
        assert!(!patterns.is_ignored(Path::new("strata.toml"), false));
    }

    #[test]
    fn directories_outside_context_change_nothing() {
        let context = tempdir().unwrap();
        let store = tempdir().unwrap();
        let patterns = IgnorePatterns::none()
            .excluding(context.path(), store.path())
            .excluding(context.path(), context.path());
        assert!(patterns.excluded.is_empty());
    }

    #[test]
    fn malformed_pattern_is_a_config_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".strataignore"), "*.pyc\nbad[\n").unwrap();
        let err = IgnorePatterns::load(dir.path(), ".strataignore").unwrap_err();
        match err {
            StrataError::InvalidConfig { file, .. } => assert!(file.ends_with(".strataignore")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
