//! Render command handler

use std::path::Path;

use anyhow::Result;

use strata::application::resolve_recipe;
use strata::domain::services::render_build_file;

use super::context::CommandContext;
use super::output::emit;

pub fn cmd_render(context: &Path, json: bool) -> Result<i32> {
    let ctx = CommandContext::load(context)?;
    let recipe = resolve_recipe(ctx.config())?;
    let rendered = render_build_file(&recipe);

    if json {
        emit(serde_json::json!({
            "event": "complete",
            "command": "render",
            "recipe": ctx.loaded.source.as_ref().map(|p| p.display().to_string()),
            "dockerfile": rendered,
        }))?;
    } else {
        print!("{}", rendered);
    }
    Ok(0)
}
