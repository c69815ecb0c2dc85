//! Text Event Sink
//!
//! One progress line per stage, written to stderr so stdout stays clean for
//! the entry process and for `render`.

use std::io::{self, Write};
use std::sync::Mutex;

use is_terminal::IsTerminal;

use crate::domain::ports::{BuildEvent, BuildEventSink};
use crate::domain::value_objects::StageKind;

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Human-readable build progress
pub struct TextEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    color: bool,
}

impl TextEventSink {
    /// Stderr, colored when it is a terminal and NO_COLOR is unset
    pub fn stderr() -> Self {
        let color = supports_color(|key| std::env::var(key).ok(), io::stderr().is_terminal());
        Self {
            writer: Mutex::new(Box::new(io::stderr())),
            color,
        }
    }

    /// Create a text sink writing to a custom writer (for testing)
    #[allow(dead_code)]
    pub fn with_writer<W: Write + Send + 'static>(writer: W, color: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            color,
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn write_line(&self, line: String) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }

    fn stage_line(&self, stage: StageKind, status: String, detail: String) -> String {
        format!(
            "[{}/{}] {:<22} {} {}",
            stage.index() + 1,
            StageKind::ORDER.len(),
            stage.as_str(),
            status,
            detail
        )
        .trim_end()
        .to_string()
    }
}

impl BuildEventSink for TextEventSink {
    fn on_event(&self, event: BuildEvent) {
        match event {
            BuildEvent::Started { image, context, .. } => {
                self.write_line(format!("Building '{}' from {}", image, context.display()));
            }
            BuildEvent::StageCached { stage, key } => {
                let line = self.stage_line(
                    stage,
                    self.paint(DIM, "CACHED"),
                    self.paint(DIM, key.short()),
                );
                self.write_line(line);
            }
            BuildEvent::StageStarted { .. } => {}
            BuildEvent::StageBuilt {
                stage,
                key,
                file_count,
                total_bytes,
            } => {
                let detail = if file_count == 0 {
                    key.short().to_string()
                } else {
                    format!(
                        "{} ({} files, {})",
                        key.short(),
                        file_count,
                        format_bytes(total_bytes)
                    )
                };
                let line = self.stage_line(stage, self.paint(GREEN, "BUILT "), detail);
                self.write_line(line);
            }
            BuildEvent::StageFailed { stage, .. } => {
                let line = self.stage_line(stage, self.paint(RED, "FAILED"), String::new());
                self.write_line(line);
            }
            BuildEvent::Warning { message } => {
                self.write_line(format!("{} {}", self.paint(YELLOW, "warning:"), message));
            }
            BuildEvent::Completed {
                image,
                top_key,
                built,
                cached,
            } => {
                self.write_line(format!(
                    "Built '{}' {} ({} built, {} cached)",
                    image,
                    top_key.short(),
                    built,
                    cached
                ));
            }
        }
    }
}

fn supports_color(get_env: impl Fn(&str) -> Option<String>, is_tty: bool) -> bool {
    let term = get_env("TERM").unwrap_or_default();
    is_tty && !term.eq_ignore_ascii_case("dumb") && get_env("NO_COLOR").is_none()
}

/// `1536` -> `1.5 KiB`
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
