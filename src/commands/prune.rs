//! Prune command handler

use anyhow::Result;

use strata::application::{PruneOptions, PruneUseCase};
use strata::infrastructure::format_bytes;

use super::context::store_from_cwd;
use super::output::emit;

pub fn cmd_prune(dry_run: bool, json: bool) -> Result<i32> {
    let use_case = PruneUseCase::new(store_from_cwd()?);
    let result = use_case.execute(&PruneOptions::new().with_dry_run(dry_run))?;

    if json {
        let layers: Vec<&str> = result.layers.iter().map(|k| k.as_str()).collect();
        let scratch: Vec<String> = result
            .scratch
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        emit(serde_json::json!({
            "event": "complete",
            "command": "prune",
            "dry_run": result.dry_run,
            "layers": layers,
            "scratch": scratch,
            "kept": result.kept,
            "bytes_freed": result.bytes_freed,
        }))?;
        return Ok(0);
    }

    if result.is_empty() {
        println!("Nothing to prune ({} layers in use)", result.kept);
        return Ok(0);
    }
    let verb = if dry_run { "Would remove" } else { "Removed" };
    for key in &result.layers {
        println!("{} layer {}", verb, key.short());
    }
    for path in &result.scratch {
        println!("{} scratch {}", verb, path.display());
    }
    println!(
        "{} {} layers and {} scratch roots, {} ({} layers in use)",
        verb,
        result.layers.len(),
        result.scratch.len(),
        format_bytes(result.bytes_freed),
        result.kept
    );
    Ok(0)
}
