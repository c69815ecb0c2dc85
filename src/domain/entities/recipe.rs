//! Recipe entity - validated build inputs other than files

use std::path::PathBuf;

use crate::domain::value_objects::{BaseImage, EntryCommand, PackageSet, Workdir};

/// Everything a build needs besides the manifest and source tree.
///
/// Constructed from configuration by the application layer; each field has
/// already been checked by its value object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub base: BaseImage,
    pub workdir: Workdir,
    pub packages: PackageSet,
    pub system_install: String,
    pub system_clean: String,
    /// Manifest path relative to the build context
    pub manifest_path: PathBuf,
    pub dependency_install: String,
    pub require_pins: bool,
    pub ignore_file: String,
    pub entry: EntryCommand,
}

impl Recipe {
    /// Absolute in-image path of the staged manifest (`/app/requirements.txt`)
    pub fn staged_manifest(&self) -> String {
        let file_name = self
            .manifest_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "requirements.txt".to_string());
        if self.workdir.as_str() == "/" {
            format!("/{}", file_name)
        } else {
            format!("{}/{}", self.workdir, file_name)
        }
    }
}
