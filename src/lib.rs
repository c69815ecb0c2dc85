//! Strata - layer-cached image provisioner
//!
//! Strata builds a runnable image for a single-process Python application
//! (a chat bot, a worker) from a build context: a pinned base, a working
//! directory, system build tools, the application's pinned dependencies, and
//! its source. Each stage is committed as a content-addressed layer, so a
//! rebuild after a source-only edit reuses every dependency layer.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use config::Config;
pub use domain::value_objects::{CacheKey, StageKind};
pub use error::{StrataError, StrataResult};
