//! Stage kinds of the provisioning pipeline

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One step of the provisioning sequence.
///
/// The declaration order is the execution order. Dependencies are staged and
/// installed before the source tree so that editing source never invalidates
/// the dependency layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageKind {
    /// Select the pinned base runtime
    Base,
    /// Set the working directory
    Workdir,
    /// Install the compiler toolchain, then drop package index caches
    SystemPackages,
    /// Copy the dependency manifest alone into the working directory
    StageManifest,
    /// Install the manifest's dependencies
    InstallDependencies,
    /// Copy the application source tree
    StageSource,
    /// Fix the entry command
    Entry,
}

impl StageKind {
    /// All stages in execution order
    pub const ORDER: [StageKind; 7] = [
        StageKind::Base,
        StageKind::Workdir,
        StageKind::SystemPackages,
        StageKind::StageManifest,
        StageKind::InstallDependencies,
        StageKind::StageSource,
        StageKind::Entry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Base => "base",
            StageKind::Workdir => "workdir",
            StageKind::SystemPackages => "system-packages",
            StageKind::StageManifest => "stage-manifest",
            StageKind::InstallDependencies => "install-dependencies",
            StageKind::StageSource => "stage-source",
            StageKind::Entry => "entry",
        }
    }

    /// Position in the pipeline (0-based)
    pub fn index(&self) -> usize {
        Self::ORDER
            .iter()
            .position(|s| s == self)
            .unwrap_or(Self::ORDER.len())
    }

    /// Whether this stage runs an external command
    pub fn runs_command(&self) -> bool {
        matches!(
            self,
            StageKind::SystemPackages | StageKind::InstallDependencies
        )
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("unknown stage '{}'", s))
    }
}
