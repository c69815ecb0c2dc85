//! Event Sink Implementations
//!
//! Provides concrete implementations of BuildEventSink:
//! - JsonEventSink: NDJSON output for CI/automation
//! - TextEventSink: Human-readable progress on stderr

mod json;
mod text;

pub use json::JsonEventSink;
pub use text::{format_bytes, TextEventSink};
