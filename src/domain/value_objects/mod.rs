//! Domain Value Objects
//!
//! Immutable, validated values the pipeline is built from.

mod base_image;
mod config_warning;
mod entry;
mod hash;
mod ignore_patterns;
mod package_set;
mod stage;
mod workdir;

pub use base_image::BaseImage;
pub use config_warning::ConfigWarning;
pub use entry::EntryCommand;
pub use hash::{CacheKey, ContentHash, InputDigest};
pub use ignore_patterns::IgnorePatterns;
pub use package_set::PackageSet;
pub use stage::StageKind;
pub use workdir::{Workdir, DEPENDENCY_DIR};
