//! Container build file rendering
//!
//! Produces the Dockerfile equivalent of a recipe, with instructions in
//! stage order. Useful for building the same image with a container engine.

use std::fmt::Write as _;

use crate::domain::entities::Recipe;

use super::command_template::{expand, TemplateVars};

/// Render `recipe` as a container build file.
pub fn render_build_file(recipe: &Recipe) -> String {
    let mut out = String::new();
    let manifest_file = recipe
        .manifest_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "requirements.txt".to_string());
    let manifest_src = recipe.manifest_path.to_string_lossy().replace('\\', "/");
    let packages = recipe.packages.joined();

    let vars = TemplateVars {
        packages: Some(&packages),
        manifest: Some(&manifest_file),
        layer: Some(""),
        workdir: Some(recipe.workdir.as_str()),
    };

    let _ = writeln!(out, "FROM {}", recipe.base);
    let _ = writeln!(out);
    let _ = writeln!(out, "WORKDIR {}", recipe.workdir);

    if !recipe.packages.is_empty() {
        let install = expand(&recipe.system_install, &vars);
        let clean = expand(&recipe.system_clean, &vars);
        let _ = writeln!(out);
        if clean.trim().is_empty() {
            let _ = writeln!(out, "RUN {}", install);
        } else {
            let _ = writeln!(out, "RUN {} \\\n    && {}", install, clean);
        }
    }

    let _ = writeln!(out);
    if manifest_src == manifest_file {
        let _ = writeln!(out, "COPY {} .", manifest_src);
    } else {
        let _ = writeln!(out, "COPY {} ./{}", manifest_src, manifest_file);
    }
    let mut env = recipe.entry.env().clone();
    if !recipe.dependency_install.trim().is_empty() {
        let _ = writeln!(out, "RUN {}", expand(&recipe.dependency_install, &vars));
        env.insert(
            "PYTHONPATH".to_string(),
            recipe.entry.python_path(&recipe.workdir.dependency_dir()),
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "COPY . .");

    if !env.is_empty() {
        let _ = writeln!(out);
        for (name, value) in env {
            let _ = writeln!(out, "ENV {}={}", name, serde_json::Value::String(value));
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "CMD {}", recipe.entry.exec_form());
    out
}
