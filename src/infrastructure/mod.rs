//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Atomic writes, hashing, tree copies, context scanning
//! - `repositories/` - Layer store on local disk
//! - `process/` - Shell command runner and entry process launcher
//! - `events/` - Build event sinks (text, NDJSON)

pub mod events;
pub mod fs;
pub mod process;
pub mod repositories;

// Re-export for convenience
pub use events::{format_bytes, JsonEventSink, TextEventSink};
pub use process::{ProcessLauncher, ShellRunner};
pub use repositories::FsLayerStore;
