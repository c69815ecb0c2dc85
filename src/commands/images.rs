//! Images and inspect command handlers

use anyhow::Result;

use strata::application::{ImageDetails, ImagesUseCase};
use strata::infrastructure::format_bytes;

use super::context::store_from_cwd;
use super::output::emit;

pub fn cmd_images(json: bool) -> Result<i32> {
    let use_case = ImagesUseCase::new(store_from_cwd()?);
    let images = use_case.list()?;

    if json {
        let items: Vec<serde_json::Value> = images
            .iter()
            .map(|image| {
                serde_json::json!({
                    "name": image.name,
                    "key": image.top_key().map(|k| k.as_str()),
                    "base": image.base,
                    "entry": image.entry,
                    "built_at": image.built_at,
                })
            })
            .collect();
        emit(serde_json::json!({
            "type": "images",
            "count": items.len(),
            "images": items,
        }))?;
        return Ok(0);
    }

    if images.is_empty() {
        println!("No images. Run `strata build` in a build context.");
        return Ok(0);
    }
    println!("{:<24} {:<14} {:<20} BUILT", "NAME", "KEY", "BASE");
    for image in &images {
        println!(
            "{:<24} {:<14} {:<20} {}",
            image.name,
            image.top_key().map(|k| k.short()).unwrap_or("-"),
            image.base,
            image.built_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(0)
}

pub fn cmd_inspect(name: &str, json: bool) -> Result<i32> {
    let use_case = ImagesUseCase::new(store_from_cwd()?);
    let details = use_case.inspect(name)?;

    if json {
        emit(inspect_json(&details))?;
    } else {
        print!("{}", inspect_text(&details));
    }
    Ok(0)
}

fn inspect_json(details: &ImageDetails) -> serde_json::Value {
    let image = &details.image;
    let layers: Vec<serde_json::Value> = details
        .layers
        .iter()
        .map(|l| {
            serde_json::json!({
                "stage": l.layer.stage.as_str(),
                "key": l.layer.key.as_str(),
                "present": l.record.is_some(),
                "file_count": l.record.as_ref().map(|r| r.file_count),
                "total_bytes": l.record.as_ref().map(|r| r.total_bytes),
            })
        })
        .collect();
    serde_json::json!({
        "type": "image",
        "name": image.name,
        "base": image.base,
        "workdir": image.workdir,
        "entry": image.entry,
        "env": image.env,
        "packages": image.packages,
        "dependencies": image.dependencies,
        "manifest": image.manifest.as_str(),
        "source": image.source.as_str(),
        "built_at": image.built_at,
        "complete": details.is_complete(),
        "layers": layers,
    })
}

fn inspect_text(details: &ImageDetails) -> String {
    let image = &details.image;
    let mut out = String::new();
    out.push_str(&format!("Image:        {}\n", image.name));
    out.push_str(&format!("Base:         {}\n", image.base));
    out.push_str(&format!("Workdir:      {}\n", image.workdir));
    out.push_str(&format!("Entry:        {}\n", image.entry.join(" ")));
    for (key, value) in &image.env {
        out.push_str(&format!("Env:          {}={}\n", key, value));
    }
    out.push_str(&format!("Packages:     {}\n", image.packages.join(" ")));
    out.push_str(&format!("Dependencies: {}\n", image.dependencies.len()));
    for dep in &image.dependencies {
        out.push_str(&format!("  {}\n", dep));
    }
    out.push_str(&format!(
        "Built:        {}\n",
        image.built_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "Size:         {}\n",
        format_bytes(details.total_bytes())
    ));
    out.push_str("Layers:\n");
    for layer in &details.layers {
        let status = match &layer.record {
            Some(record) => format!(
                "{} files, {}",
                record.file_count,
                format_bytes(record.total_bytes)
            ),
            None => "MISSING".to_string(),
        };
        out.push_str(&format!(
            "  {:<22} {}  {}\n",
            layer.layer.stage.as_str(),
            layer.layer.key.short(),
            status
        ));
    }
    out
}
