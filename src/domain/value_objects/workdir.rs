//! Working directory value object

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::{StrataError, StrataResult};

/// Directory below the workdir that dependency installs target
pub const DEPENDENCY_DIR: &str = ".deps";

/// Absolute, normalized directory inside the image (`/app`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Workdir(String);

impl Workdir {
    pub fn parse(raw: &str) -> StrataResult<Self> {
        let invalid = || StrataError::InvalidWorkdir {
            path: raw.to_string(),
        };
        if !raw.starts_with('/') {
            return Err(invalid());
        }

        let mut parts: Vec<&str> = Vec::new();
        for part in raw.split('/') {
            match part {
                "" | "." => {}
                ".." => return Err(invalid()),
                other => parts.push(other),
            }
        }
        Ok(Self(format!("/{}", parts.join("/"))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Image path of the dependency directory (`/app/.deps`)
    pub fn dependency_dir(&self) -> String {
        format!("{}/{}", self.0.trim_end_matches('/'), DEPENDENCY_DIR)
    }

    /// Location of this directory under a host-side root
    pub fn under(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for component in Path::new(&self.0).components() {
            if let Component::Normal(part) = component {
                path.push(part);
            }
        }
        path
    }
}

impl fmt::Display for Workdir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
