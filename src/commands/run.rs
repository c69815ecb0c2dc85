//! Run command handler

use std::path::Path;

use anyhow::Result;

use strata::application::{LaunchOptions, LaunchUseCase};
use strata::infrastructure::ProcessLauncher;

use super::context::CommandContext;
use super::output::emit;

/// Exit status mirrors the entry process
pub fn cmd_run(context: &Path, name: Option<String>, args: Vec<String>, json: bool) -> Result<i32> {
    let ctx = CommandContext::load(context)?;
    let name = ctx.image_name(name);

    let use_case = LaunchUseCase::new(ctx.open_store()?, ProcessLauncher::new());
    let code = use_case.execute(&LaunchOptions::new(name.clone()).with_args(args))?;

    if json {
        emit(serde_json::json!({
            "event": "complete",
            "command": "run",
            "image": name,
            "exit_code": code,
        }))?;
    }
    Ok(code)
}
