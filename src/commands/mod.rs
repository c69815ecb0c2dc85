//! Command handlers
//!
//! Each handler loads configuration, wires infrastructure into a use case,
//! and renders the result as text or NDJSON.

pub mod build;
mod context;
pub mod images;
pub mod init;
pub mod output;
pub mod plan;
pub mod prune;
pub mod render;
pub mod run;
