//! Dependency manifest entity

use std::path::{Path, PathBuf};

use crate::domain::services::requirements::{parse_manifest, ManifestLine, Requirement};
use crate::domain::value_objects::ContentHash;
use crate::error::{StrataError, StrataResult};

/// A validated `requirements.txt`.
///
/// Its content hash feeds the cache key of the manifest stage, so any edit
/// to the manifest invalidates the dependency layers and nothing before them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Path relative to the build context
    path: PathBuf,
    content: String,
    lines: Vec<ManifestLine>,
}

impl Manifest {
    pub fn parse(path: impl Into<PathBuf>, content: impl Into<String>) -> StrataResult<Self> {
        let path = path.into();
        let content = content.into();
        let lines = parse_manifest(&content).map_err(|e| StrataError::InvalidManifest {
            file: path.clone(),
            line: e.line,
            message: e.message,
        })?;
        Ok(Self {
            path,
            content,
            lines,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name the manifest is staged under in the working directory
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "requirements.txt".to_string())
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn hash(&self) -> ContentHash {
        ContentHash::from_content(&self.content)
    }

    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.lines.iter().filter_map(|line| match line {
            ManifestLine::Requirement(req) => Some(req),
            ManifestLine::Option { .. } => None,
        })
    }

    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            ManifestLine::Option { text, .. } => Some(text.as_str()),
            ManifestLine::Requirement(_) => None,
        })
    }

    /// Fail on the first requirement not pinned to an exact version
    pub fn ensure_pinned(&self) -> StrataResult<()> {
        match self.requirements().find(|req| !req.is_pinned()) {
            Some(req) => Err(StrataError::UnpinnedRequirement {
                name: req.name.clone(),
                file: self.path.clone(),
                line: req.line,
            }),
            None => Ok(()),
        }
    }

    /// `name` + specifiers (and any `--hash` style options) of every
    /// requirement, for image records
    pub fn declared_packages(&self) -> Vec<String> {
        self.requirements()
            .map(|req| {
                let specs: Vec<String> = req.specifiers.iter().map(|s| s.to_string()).collect();
                let mut declared = match &req.url {
                    Some(url) => format!("{} @ {}", req.normalized_name(), url),
                    None => format!("{}{}", req.normalized_name(), specs.join(",")),
                };
                for option in &req.options {
                    declared.push(' ');
                    declared.push_str(option);
                }
                declared
            })
            .collect()
    }
}
