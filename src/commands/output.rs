//! NDJSON output helpers

use std::io::{self, Write};

/// Write a single NDJSON event (one JSON object per line).
pub fn write_event(out: &mut impl Write, event: &serde_json::Value) -> io::Result<()> {
    let line = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Write a raw JSON value to stdout.
pub fn emit(event: serde_json::Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_event(&mut out, &event)
}

/// Error message with its causes, skipping causes the message already
/// spells out (stage failures embed their cause)
pub fn render_error(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    for cause in error.chain().skip(1) {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
    }
    message
}

/// Final error event for `--json` runs
pub fn emit_error(error: &anyhow::Error) {
    let stage = error
        .downcast_ref::<strata::StrataError>()
        .and_then(|e| e.failed_stage())
        .map(|s| s.as_str());
    let _ = emit(serde_json::json!({
        "event": "error",
        "stage": stage,
        "message": render_error(error),
    }));
}
