//! Init command - write a starter recipe into a build context

use std::path::Path;

use anyhow::{bail, Context, Result};

use strata::config::{DEFAULT_IGNORE, DEFAULT_RECIPE, RECIPE_FILE};
use strata::infrastructure::fs::atomic_write;

use super::output::emit;

const IGNORE_FILE: &str = ".strataignore";

pub fn cmd_init(context: &Path, force: bool, json: bool) -> Result<i32> {
    if !context.is_dir() {
        bail!("build context {} is not a directory", context.display());
    }

    let recipe = context.join(RECIPE_FILE);
    if recipe.exists() && !force {
        if json {
            let _ = emit(serde_json::json!({
                "event": "error",
                "command": "init",
                "kind": "already_exists",
                "path": recipe.display().to_string(),
                "message": format!("{} already exists", RECIPE_FILE),
            }));
        }
        bail!(
            "{} already exists at {}. Use --force to overwrite.",
            RECIPE_FILE,
            recipe.display()
        );
    }

    atomic_write(&recipe, DEFAULT_RECIPE.as_bytes())
        .with_context(|| format!("failed to write {}", recipe.display()))?;
    let mut written = vec![recipe.display().to_string()];

    // An existing ignore file is the user's; never replace it
    let ignore = context.join(IGNORE_FILE);
    if !ignore.exists() {
        atomic_write(&ignore, DEFAULT_IGNORE.as_bytes())
            .with_context(|| format!("failed to write {}", ignore.display()))?;
        written.push(ignore.display().to_string());
    }

    if json {
        emit(serde_json::json!({
            "event": "complete",
            "command": "init",
            "files": written,
        }))?;
    } else {
        for path in &written {
            println!("Created {}", path);
        }
        println!();
        println!("Next: run `strata build` to build the image");
    }
    Ok(0)
}
