//! Build Event Port
//!
//! Provides an observable interface for builds.
//! Enables terminal progress lines, JSON event streams, and tests.

use std::path::PathBuf;

use crate::domain::value_objects::{CacheKey, StageKind};

/// Event emitted during a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// Build started
    Started {
        image: String,
        context: PathBuf,
        stages: usize,
    },

    /// A stage reused its committed layer
    StageCached { stage: StageKind, key: CacheKey },

    /// A stage is about to run
    StageStarted { stage: StageKind, key: CacheKey },

    /// A stage ran and its layer was committed
    StageBuilt {
        stage: StageKind,
        key: CacheKey,
        file_count: u64,
        total_bytes: u64,
    },

    /// A stage failed; the build stops
    StageFailed { stage: StageKind, error: String },

    /// Something the user should know about that does not fail the build
    Warning { message: String },

    /// Image record written
    Completed {
        image: String,
        top_key: CacheKey,
        built: usize,
        cached: usize,
    },
}

/// Trait for receiving build events
///
/// Implementations can be:
/// - TextEventSink: one line per stage on stderr
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait BuildEventSink: Send + Sync {
    /// Handle a build event
    fn on_event(&self, event: BuildEvent);

    /// Check if this sink wants per-stage events
    ///
    /// Summary-only sinks return false and still get `Started`, `Warning`,
    /// `StageFailed` and `Completed`.
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl BuildEventSink for NoopEventSink {
    fn on_event(&self, _event: BuildEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
