//! Configuration type definitions
//!
//! A `strata.toml` recipe describes one image. Every field has a default, and
//! the defaults reproduce the reference bot image:
//!
//! ```toml
//! [image]
//! base = "python:3.10-slim"
//! workdir = "/app"
//!
//! [system]
//! packages = ["gcc", "build-essential"]
//!
//! [dependencies]
//! manifest = "requirements.txt"
//!
//! [entry]
//! command = ["python", "telegram_bot.py"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ConfigWarning;
use crate::error::StrataResult;

use super::loader;

/// File name of the recipe inside a build context
pub const RECIPE_FILE: &str = "strata.toml";

/// Image identity and runtime base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Image name; defaults to the context directory name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default = "default_base")]
    pub base: String,

    #[serde(default = "default_workdir")]
    pub workdir: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            name: None,
            base: default_base(),
            workdir: default_workdir(),
        }
    }
}

fn default_base() -> String {
    "python:3.10-slim".to_string()
}

fn default_workdir() -> String {
    "/app".to_string()
}

/// OS package installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_packages")]
    pub packages: Vec<String>,

    /// Install command; `{packages}` expands to the space-joined list
    #[serde(default = "default_system_install")]
    pub install: String,

    /// Runs right after install in the same stage, so package index caches
    /// never end up in a layer
    #[serde(default = "default_system_clean")]
    pub clean: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            packages: default_packages(),
            install: default_system_install(),
            clean: default_system_clean(),
        }
    }
}

fn default_packages() -> Vec<String> {
    vec!["gcc".to_string(), "build-essential".to_string()]
}

/// apt state and downloads live under the stage layer; packages are
/// unpacked into it instead of the host root
fn default_system_install() -> String {
    concat!(
        "mkdir -p {layer}/var/lib/apt/lists/partial {layer}/var/cache/apt/archives/partial",
        " && apt-get -o Dir::State::Lists={layer}/var/lib/apt/lists -o Dir::Cache={layer}/var/cache/apt update",
        " && apt-get -o Dir::State::Lists={layer}/var/lib/apt/lists -o Dir::Cache={layer}/var/cache/apt",
        " install -y --no-install-recommends --download-only {packages}",
        " && for deb in {layer}/var/cache/apt/archives/*.deb; do dpkg-deb -x \"$deb\" {layer}/; done",
    )
    .to_string()
}

fn default_system_clean() -> String {
    "rm -rf {layer}/var/lib/apt/lists/* {layer}/var/cache/apt".to_string()
}

/// Third-party dependency installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependenciesConfig {
    /// Manifest path relative to the context
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Install command; `{manifest}` expands to the staged manifest path.
    /// Packages belong in `{layer}{workdir}/.deps`, which launch puts on
    /// `PYTHONPATH`.
    #[serde(default = "default_dependency_install")]
    pub install: String,

    /// Reject requirements that are not pinned with `==`
    #[serde(default)]
    pub require_pins: bool,
}

impl Default for DependenciesConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            install: default_dependency_install(),
            require_pins: false,
        }
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("requirements.txt")
}

fn default_dependency_install() -> String {
    "pip install --no-cache-dir --target {layer}{workdir}/.deps -r {manifest}".to_string()
}

/// Source tree staging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            ignore_file: default_ignore_file(),
        }
    }
}

fn default_ignore_file() -> String {
    ".strataignore".to_string()
}

/// Entry process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    #[serde(default = "default_entry_command")]
    pub command: Vec<String>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            command: default_entry_command(),
            env: BTreeMap::new(),
        }
    }
}

fn default_entry_command() -> Vec<String> {
    vec!["python".to_string(), "telegram_bot.py".to_string()]
}

/// Where layers live and how commands are run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Layer store directory; defaults to the user cache dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_shell")]
    pub shell: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            shell: default_shell(),
        }
    }
}

fn default_shell() -> String {
    "/bin/sh".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub system: SystemConfig,

    #[serde(default)]
    pub dependencies: DependenciesConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub entry: EntryConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> StrataResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> StrataResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load the recipe for a build context (context recipe, user config, or
    /// defaults) with environment overrides applied.
    pub fn load_for_context(context: &Path) -> StrataResult<LoadedConfig> {
        loader::load_for_context(context)
    }

    /// Apply environment variable overrides (STRATA_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Image name, falling back to the context directory name
    pub fn image_name(&self, context: &Path) -> String {
        if let Some(name) = self.image.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return sanitize_image_name(name);
        }
        let dir_name = context
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()));
        sanitize_image_name(dir_name.as_deref().unwrap_or("image"))
    }

    /// Resolved layer store directory
    pub fn store_path(&self) -> PathBuf {
        match &self.store.path {
            Some(path) => path.clone(),
            None => dirs::cache_dir()
                .map(|dir| dir.join("strata"))
                .unwrap_or_else(|| PathBuf::from(".strata")),
        }
    }
}

/// A configuration plus where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the recipe was read from; `None` for built-in defaults
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Lowercase, `[a-z0-9._-]` only; anything else becomes `-`.
pub fn sanitize_image_name(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c| matches!(c, '.' | '-')).to_string();
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}
