//! Build input loading
//!
//! Turns configuration and a build context into validated domain inputs.
//! Every check reports the stage it belongs to, and all of them run before
//! any stage executes, so a bad manifest can never leave a staged source
//! tree behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::domain::entities::{Manifest, Recipe, SourceTree};
use crate::domain::value_objects::{
    BaseImage, EntryCommand, IgnorePatterns, PackageSet, StageKind, Workdir,
};
use crate::error::{StrataError, StrataResult};
use crate::infrastructure::fs::scan_source;

/// Validated inputs of one build
#[derive(Debug, Clone)]
pub struct BuildInputs {
    pub context: PathBuf,
    pub recipe: Recipe,
    pub manifest: Manifest,
    pub source: SourceTree,
}

impl BuildInputs {
    /// Load everything a build needs from `context`.
    ///
    /// `exclude` lists directories that must not be scanned as source (the
    /// layer store, when it lives inside the context).
    pub fn load(context: &Path, config: &Config, exclude: &[PathBuf]) -> StrataResult<Self> {
        let recipe = resolve_recipe(config)?;
        let manifest = load_manifest(context, &recipe)?;
        let source = load_source(context, &recipe, exclude)?;
        Ok(Self {
            context: context.to_path_buf(),
            recipe,
            manifest,
            source,
        })
    }

    /// Warning for an entry script that is not part of the source tree.
    ///
    /// The build still succeeds; `run` is where a missing script fails.
    pub fn entry_script_warning(&self) -> Option<String> {
        let script = self.recipe.entry.script()?;
        let rel = script_in_workdir(script, &self.recipe.workdir)?;
        if self.source.contains(&rel) {
            return None;
        }
        Some(format!(
            "entry script '{}' is not in the build context; `strata run` will fail",
            script
        ))
    }
}

/// Validate configuration into a [`Recipe`], stage by stage.
pub fn resolve_recipe(config: &Config) -> StrataResult<Recipe> {
    let base = BaseImage::parse(&config.image.base).map_err(|e| e.at_stage(StageKind::Base))?;
    let workdir =
        Workdir::parse(&config.image.workdir).map_err(|e| e.at_stage(StageKind::Workdir))?;
    let packages = PackageSet::new(&config.system.packages)
        .map_err(|e| e.at_stage(StageKind::SystemPackages))?;
    let entry = EntryCommand::new(config.entry.command.clone(), config.entry.env.clone())
        .map_err(|e| e.at_stage(StageKind::Entry))?;

    Ok(Recipe {
        base,
        workdir,
        packages,
        system_install: config.system.install.clone(),
        system_clean: config.system.clean.clone(),
        manifest_path: config.dependencies.manifest.clone(),
        dependency_install: config.dependencies.install.clone(),
        require_pins: config.dependencies.require_pins,
        ignore_file: config.source.ignore_file.clone(),
        entry,
    })
}

/// Read and validate the dependency manifest
pub fn load_manifest(context: &Path, recipe: &Recipe) -> StrataResult<Manifest> {
    let at = |e: StrataError| e.at_stage(StageKind::StageManifest);
    let path = context.join(&recipe.manifest_path);

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(at(StrataError::ManifestMissing { path }));
        }
        Err(e) => return Err(at(StrataError::Io(e))),
    };

    let manifest = Manifest::parse(&recipe.manifest_path, content).map_err(at)?;
    if recipe.require_pins {
        manifest.ensure_pinned().map_err(at)?;
    }
    tracing::debug!(
        manifest = %path.display(),
        requirements = manifest.requirements().count(),
        "manifest loaded"
    );
    Ok(manifest)
}

/// Scan the source tree with the recipe's ignore file, skipping `exclude`
pub fn load_source(context: &Path, recipe: &Recipe, exclude: &[PathBuf]) -> StrataResult<SourceTree> {
    let at = |e: StrataError| e.at_stage(StageKind::StageSource);
    let ignore = exclude.iter().fold(
        IgnorePatterns::load(context, &recipe.ignore_file).map_err(at)?,
        |ignore, dir| ignore.excluding(context, dir),
    );
    scan_source(context, &ignore).map_err(at)
}

/// Context-relative path of an entry script, if it lives in the workdir
fn script_in_workdir(script: &str, workdir: &Workdir) -> Option<String> {
    if !script.starts_with('/') {
        return Some(script.trim_start_matches("./").to_string());
    }
    let prefix = if workdir.as_str() == "/" {
        "/".to_string()
    } else {
        format!("{}/", workdir)
    };
    script.strip_prefix(&prefix).map(str::to_string)
}
