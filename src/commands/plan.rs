//! Plan command handler

use std::path::Path;

use anyhow::Result;

use strata::application::{PlanOptions, PlanResult, PlanUseCase};
use strata::domain::services::StageAction;
use strata::StageKind;

use super::context::CommandContext;
use super::output::emit;

pub fn cmd_plan(
    context: &Path,
    tag: Option<String>,
    no_cache: bool,
    diff: bool,
    json: bool,
) -> Result<i32> {
    let ctx = CommandContext::load(context)?;
    let options = PlanOptions::new(ctx.image_name(tag))
        .with_no_cache(no_cache)
        .with_manifest_diff(diff);

    let use_case = PlanUseCase::new(ctx.open_store()?);
    let result = use_case.execute_context(&ctx.context, ctx.config(), &options)?;

    if json {
        emit_json(&result)?;
    } else {
        print!("{}", render_text(&result));
    }
    Ok(0)
}

fn action_label(action: StageAction) -> &'static str {
    match action {
        StageAction::Cached => "cached",
        StageAction::Build => "build",
    }
}

fn render_text(result: &PlanResult) -> String {
    let mut out = String::new();
    match &result.previous {
        Some(prev) => out.push_str(&format!(
            "Plan for '{}' (last built {})\n",
            result.image,
            prev.built_at.format("%Y-%m-%d %H:%M:%S UTC")
        )),
        None => out.push_str(&format!("Plan for '{}' (never built)\n", result.image)),
    }

    let changed = result.changed_stages();
    for stage in result.plan.stages() {
        let marker = if changed.contains(&stage.stage) { "*" } else { " " };
        out.push_str(&format!(
            "{} [{}/{}] {:<22} {:<6} {}\n",
            marker,
            stage.stage.index() + 1,
            StageKind::ORDER.len(),
            stage.stage.as_str(),
            action_label(stage.action),
            stage.key.short()
        ));
    }
    out.push_str(&format!(
        "{} to build, {} cached\n",
        result.plan.build_count(),
        result.plan.cached_count()
    ));

    for warning in &result.warnings {
        out.push_str(&format!("warning: {}\n", warning));
    }
    if let Some(diff) = &result.manifest_diff {
        out.push('\n');
        out.push_str(diff);
    }
    out
}

fn emit_json(result: &PlanResult) -> std::io::Result<()> {
    let changed = result.changed_stages();
    let stages: Vec<serde_json::Value> = result
        .plan
        .stages()
        .iter()
        .map(|s| {
            serde_json::json!({
                "stage": s.stage.as_str(),
                "key": s.key.as_str(),
                "action": action_label(s.action),
                "changed": changed.contains(&s.stage),
            })
        })
        .collect();

    emit(serde_json::json!({
        "event": "complete",
        "command": "plan",
        "image": result.image,
        "stages": stages,
        "build": result.plan.build_count(),
        "cached": result.plan.cached_count(),
        "previous": result.previous.as_ref().and_then(|p| p.top_key()).map(|k| k.as_str()),
        "manifest_diff": result.manifest_diff,
        "warnings": result.warnings,
    }))
}
