//! Build command handler

use std::path::Path;

use anyhow::Result;

use strata::application::{BuildOptions, BuildUseCase};
use strata::domain::ports::BuildEventSink;
use strata::infrastructure::{JsonEventSink, TextEventSink};

use super::context::CommandContext;

pub fn cmd_build(context: &Path, tag: Option<String>, no_cache: bool, json: bool) -> Result<i32> {
    let ctx = CommandContext::load(context)?;
    let name = ctx.image_name(tag);
    let options = BuildOptions::new(name).with_no_cache(no_cache);

    let sink: Box<dyn BuildEventSink> = if json {
        Box::new(JsonEventSink::stdout())
    } else {
        Box::new(TextEventSink::stderr())
    };

    let use_case = BuildUseCase::new(ctx.open_store()?, ctx.runner());
    let result = use_case.execute_context(&ctx.context, ctx.config(), &options, sink.as_ref())?;

    if !json {
        if let Some(key) = result.image.top_key() {
            // The key alone on stdout, for scripts
            println!("{}", key);
        }
    }
    Ok(0)
}
