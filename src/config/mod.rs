//! Configuration module for strata
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (STRATA_*)
//! 3. Context recipe (`strata.toml` in the build context)
//! 4. User config (~/.config/strata/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod template;
#[cfg(test)]
mod tests;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::parse_with_warnings;
pub use template::{DEFAULT_IGNORE, DEFAULT_RECIPE};
pub use types::{
    sanitize_image_name, Config, DependenciesConfig, EntryConfig, ImageConfig, LoadedConfig,
    SourceConfig, StoreConfig, SystemConfig, RECIPE_FILE,
};
