//! Error types for Strata
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::StageKind;

/// Result type alias for Strata operations
pub type StrataResult<T> = Result<T, StrataError>;

/// Main error type for Strata operations
#[derive(Error, Debug)]
pub enum StrataError {
    /// A build stage failed; the build stops here
    #[error("build aborted at {stage}: {source}")]
    StageFailed {
        stage: StageKind,
        #[source]
        source: Box<StrataError>,
    },

    /// The system package install (or cleanup) command failed
    #[error("system package installation failed (exit {}){}", .status, stderr_suffix(.stderr))]
    SystemInstallFailed { status: i32, stderr: String },

    /// The dependency install command failed (unresolvable or broken manifest)
    #[error("dependency installation failed (exit {}){}", .status, stderr_suffix(.stderr))]
    DependencyInstallFailed { status: i32, stderr: String },

    /// Copying a file into a layer failed
    #[error("failed to copy {path}: {source}")]
    SourceCopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file no longer matches the content its layer key was built from
    #[error("{path} changed during the build - run `strata build` again")]
    SourceChanged { path: PathBuf },

    /// Entry command is empty
    #[error("entry command is undefined - set [entry] command in strata.toml")]
    UndefinedEntry,

    /// Base image has no version pin
    #[error("base image '{reference}' is not pinned - use an explicit tag or digest other than 'latest'")]
    UnpinnedBase { reference: String },

    /// Working directory must be absolute
    #[error("working directory '{path}' must be an absolute path")]
    InvalidWorkdir { path: String },

    /// A system package name is not usable
    #[error("invalid system package name '{name}'")]
    InvalidPackage { name: String },

    /// Dependency manifest does not exist in the build context
    #[error("dependency manifest not found: {path}")]
    ManifestMissing { path: PathBuf },

    /// Dependency manifest has a line we cannot interpret
    #[error("invalid requirement in {file}:{line}: {message}")]
    InvalidManifest {
        file: PathBuf,
        line: usize,
        message: String,
    },

    /// A requirement is not pinned with `==` while pins are required
    #[error("requirement '{name}' in {file}:{line} is not pinned with '=='")]
    UnpinnedRequirement {
        name: String,
        file: PathBuf,
        line: usize,
    },

    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// No image record with this name
    #[error("image '{name}' not found - run `strata build` first")]
    ImageNotFound { name: String },

    /// An image references a layer that is no longer in the store
    #[error("layer {key} referenced by image '{image}' is missing from the store")]
    LayerMissing { image: String, key: String },

    /// A record in the store could not be read back
    #[error("corrupted store record {path}: {message}")]
    StoreCorrupted { path: PathBuf, message: String },

    /// Entry script is not present in the assembled root
    #[error("entry script not found: {script} (looked in {workdir})")]
    EntryScriptNotFound { script: String, workdir: PathBuf },

    /// Entry process could not be spawned
    #[error("failed to launch '{program}': {source}")]
    LaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StrataError {
    /// Wrap an error as the failure of a specific stage
    pub fn at_stage(self, stage: StageKind) -> Self {
        match self {
            already @ StrataError::StageFailed { .. } => already,
            other => StrataError::StageFailed {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Stage the build aborted at, if this is a stage failure
    pub fn failed_stage(&self) -> Option<StageKind> {
        match self {
            StrataError::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{}", trimmed)
    }
}
