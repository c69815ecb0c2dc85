//! JSON Event Sink
//!
//! Outputs build events as NDJSON for CI/automation consumption.

use crate::domain::ports::{BuildEvent, BuildEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    #[allow(dead_code)]
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl BuildEventSink for JsonEventSink {
    fn on_event(&self, event: BuildEvent) {
        let json = match event {
            BuildEvent::Started {
                image,
                context,
                stages,
            } => serde_json::json!({
                "event": "start",
                "command": "build",
                "image": image,
                "context": context.display().to_string(),
                "stages": stages,
            }),

            BuildEvent::StageCached { stage, key } => serde_json::json!({
                "event": "stage_cached",
                "command": "build",
                "stage": stage.as_str(),
                "key": key.as_str(),
            }),

            BuildEvent::StageStarted { stage, key } => serde_json::json!({
                "event": "stage_start",
                "command": "build",
                "stage": stage.as_str(),
                "key": key.as_str(),
            }),

            BuildEvent::StageBuilt {
                stage,
                key,
                file_count,
                total_bytes,
            } => serde_json::json!({
                "event": "stage_built",
                "command": "build",
                "stage": stage.as_str(),
                "key": key.as_str(),
                "file_count": file_count,
                "total_bytes": total_bytes,
            }),

            BuildEvent::StageFailed { stage, error } => serde_json::json!({
                "event": "stage_failed",
                "command": "build",
                "stage": stage.as_str(),
                "error": error,
            }),

            BuildEvent::Warning { message } => serde_json::json!({
                "event": "warning",
                "command": "build",
                "message": message,
            }),

            BuildEvent::Completed {
                image,
                top_key,
                built,
                cached,
            } => serde_json::json!({
                "event": "complete",
                "command": "build",
                "image": image,
                "key": top_key.as_str(),
                "built": built,
                "cached": cached,
            }),
        };

        self.write_event(json);
    }
}
