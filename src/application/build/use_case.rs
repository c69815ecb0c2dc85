//! Build Use Case
//!
//! Orchestrates the provisioning pipeline over a layer store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::application::inputs::BuildInputs;
use crate::config::Config;
use crate::domain::entities::{ImageLayer, ImageRecord, LayerRecord, IMAGE_RECORD_VERSION};
use crate::domain::ports::{
    BuildEvent, BuildEventSink, CommandRunner, Invocation, LayerStore, LockMode, PendingLayer,
};
use crate::domain::services::{expand, plan_stages, PlannedStage, StagePlan, TemplateVars};
use crate::domain::value_objects::{StageKind, Workdir};
use crate::error::{StrataError, StrataResult};
use crate::infrastructure::fs::{copy_file, hash_file, tree_stats};

use super::options::BuildOptions;
use super::result::BuildResult;

/// Lines of a failed command's stderr kept in the error
const STDERR_TAIL_LINES: usize = 20;

/// Build use case - runs stages and records the image
pub struct BuildUseCase<S, R>
where
    S: LayerStore,
    R: CommandRunner,
{
    store: S,
    runner: R,
}

impl<S, R> BuildUseCase<S, R>
where
    S: LayerStore,
    R: CommandRunner,
{
    /// Create a new build use case
    pub fn new(store: S, runner: R) -> Self {
        Self { store, runner }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load inputs from `context` and build.
    ///
    /// Input validation failures are reported to `events` like any other
    /// stage failure.
    pub fn execute_context(
        &self,
        context: &Path,
        config: &Config,
        options: &BuildOptions,
        events: &dyn BuildEventSink,
    ) -> StrataResult<BuildResult> {
        let exclude = vec![self.store.location().to_path_buf()];
        let inputs = BuildInputs::load(context, config, &exclude).inspect_err(|e| {
            if let Some(stage) = e.failed_stage() {
                events.on_event(BuildEvent::StageFailed {
                    stage,
                    error: e.to_string(),
                });
            }
        })?;
        self.execute(&inputs, options, events)
    }

    /// Build already-loaded inputs
    pub fn execute(
        &self,
        inputs: &BuildInputs,
        options: &BuildOptions,
        events: &dyn BuildEventSink,
    ) -> StrataResult<BuildResult> {
        let _lock = self.store.lock(LockMode::Exclusive)?;

        events.on_event(BuildEvent::Started {
            image: options.name.clone(),
            context: inputs.context.clone(),
            stages: StageKind::ORDER.len(),
        });

        let mut warnings = Vec::new();
        if let Some(warning) = inputs.entry_script_warning() {
            tracing::warn!("{}", warning);
            events.on_event(BuildEvent::Warning {
                message: warning.clone(),
            });
            warnings.push(warning);
        }

        let plan = plan_stages(&inputs.recipe, &inputs.manifest, &inputs.source)
            .resolve_cache(options.no_cache, |key| self.store.contains(key));

        for planned in plan.stages() {
            if planned.is_cached() {
                tracing::debug!(stage = %planned.stage, key = %planned.key.short(), "cache hit");
                if events.wants_detailed_events() {
                    events.on_event(BuildEvent::StageCached {
                        stage: planned.stage,
                        key: planned.key.clone(),
                    });
                }
                continue;
            }

            if events.wants_detailed_events() {
                events.on_event(BuildEvent::StageStarted {
                    stage: planned.stage,
                    key: planned.key.clone(),
                });
            }
            tracing::info!(stage = %planned.stage, key = %planned.key.short(), "running stage");

            let record = self
                .run_stage(planned, inputs, &plan)
                .map_err(|e| e.at_stage(planned.stage))
                .inspect_err(|e| {
                    events.on_event(BuildEvent::StageFailed {
                        stage: planned.stage,
                        error: e.to_string(),
                    });
                })?;

            if events.wants_detailed_events() {
                events.on_event(BuildEvent::StageBuilt {
                    stage: planned.stage,
                    key: record.key.clone(),
                    file_count: record.file_count,
                    total_bytes: record.total_bytes,
                });
            }
        }

        let image = image_record(&options.name, inputs, &plan);
        self.store.save_image(&image)?;
        tracing::info!(image = %image.name, "image recorded");

        if let Some(top_key) = plan.top_key() {
            events.on_event(BuildEvent::Completed {
                image: image.name.clone(),
                top_key: top_key.clone(),
                built: plan.build_count(),
                cached: plan.cached_count(),
            });
        }

        Ok(BuildResult {
            image,
            plan,
            warnings,
        })
    }

    /// Run one stage in a scratch layer and commit it
    fn run_stage(
        &self,
        planned: &PlannedStage,
        inputs: &BuildInputs,
        plan: &StagePlan,
    ) -> StrataResult<LayerRecord> {
        let pending = self.store.begin()?;
        let root = pending.root().to_path_buf();
        let recipe = &inputs.recipe;
        let workdir_dir = recipe.workdir.under(&root);

        match planned.stage {
            StageKind::Base | StageKind::Entry => {}
            StageKind::Workdir => fs::create_dir_all(&workdir_dir)?,
            StageKind::SystemPackages => self.install_system_packages(inputs, &root)?,
            StageKind::StageManifest => {
                // Stage the content the key was derived from
                fs::create_dir_all(&workdir_dir)?;
                let dest = workdir_dir.join(inputs.manifest.file_name());
                fs::write(&dest, inputs.manifest.content()).map_err(|source| {
                    StrataError::SourceCopyFailed {
                        path: inputs.context.join(&recipe.manifest_path),
                        source,
                    }
                })?;
            }
            StageKind::InstallDependencies => self.install_dependencies(inputs, plan, &root)?,
            StageKind::StageSource => {
                for file in inputs.source.files() {
                    let src = inputs.context.join(&file.rel_path);
                    let dest = workdir_dir.join(&file.rel_path);
                    copy_file(&src, &dest).map_err(|source| StrataError::SourceCopyFailed {
                        path: src.clone(),
                        source,
                    })?;
                    if hash_file(&dest)? != file.hash {
                        return Err(StrataError::SourceChanged { path: src });
                    }
                }
            }
        }

        let (file_count, total_bytes) = tree_stats(&root)?;
        let record = LayerRecord::new(
            planned.key.clone(),
            planned.parent.clone(),
            planned.stage,
            planned.input.clone(),
        )
        .with_contents(file_count, total_bytes);
        self.store.commit(pending, &record)?;
        Ok(record)
    }

    fn install_system_packages(&self, inputs: &BuildInputs, root: &Path) -> StrataResult<()> {
        let recipe = &inputs.recipe;
        if recipe.packages.is_empty() {
            tracing::debug!("no system packages declared");
            return Ok(());
        }

        let packages = recipe.packages.joined();
        let layer = root.display().to_string();
        let vars = TemplateVars {
            packages: Some(&packages),
            layer: Some(&layer),
            workdir: Some(recipe.workdir.as_str()),
            manifest: None,
        };
        let fail = |status: i32, stderr: String| StrataError::SystemInstallFailed { status, stderr };

        // Clean runs in the same stage so index caches never reach a layer
        for template in [&recipe.system_install, &recipe.system_clean] {
            if template.trim().is_empty() {
                continue;
            }
            let invocation = stage_invocation(
                StageKind::SystemPackages,
                expand(template, &vars),
                root.to_path_buf(),
                root,
                &recipe.workdir,
            );
            self.run_checked(&invocation, fail)?;
        }
        Ok(())
    }

    fn install_dependencies(
        &self,
        inputs: &BuildInputs,
        plan: &StagePlan,
        root: &Path,
    ) -> StrataResult<()> {
        let recipe = &inputs.recipe;
        if recipe.dependency_install.trim().is_empty() {
            tracing::debug!("no dependency install command configured");
            return Ok(());
        }

        let manifest_layer = plan
            .get(StageKind::StageManifest)
            .map(|s| self.store.layer_root(&s.key))
            .ok_or_else(|| StrataError::ManifestMissing {
                path: recipe.manifest_path.clone(),
            })?;
        let manifest = recipe
            .workdir
            .under(&manifest_layer)
            .join(inputs.manifest.file_name())
            .display()
            .to_string();
        let layer = root.display().to_string();
        let vars = TemplateVars {
            packages: None,
            manifest: Some(&manifest),
            layer: Some(&layer),
            workdir: Some(recipe.workdir.as_str()),
        };

        let cwd = recipe.workdir.under(root);
        fs::create_dir_all(&cwd)?;
        let invocation = stage_invocation(
            StageKind::InstallDependencies,
            expand(&recipe.dependency_install, &vars),
            cwd,
            root,
            &recipe.workdir,
        );
        self.run_checked(&invocation, |status, stderr| {
            StrataError::DependencyInstallFailed { status, stderr }
        })
    }

    fn run_checked(
        &self,
        invocation: &Invocation,
        fail: impl Fn(i32, String) -> StrataError,
    ) -> StrataResult<()> {
        let outcome = self
            .runner
            .run(invocation)
            .map_err(|e| fail(127, e.to_string()))?;
        if !outcome.stdout.is_empty() {
            tracing::debug!(output = %outcome.stdout.trim_end(), "command stdout");
        }
        if outcome.success() {
            Ok(())
        } else {
            Err(fail(outcome.status, tail(&outcome.stderr, STDERR_TAIL_LINES)))
        }
    }
}

fn stage_invocation(
    stage: StageKind,
    script: String,
    cwd: PathBuf,
    layer: &Path,
    workdir: &Workdir,
) -> Invocation {
    Invocation::new(script, cwd)
        .with_env("STRATA_STAGE", stage.as_str())
        .with_env("STRATA_LAYER", layer.display().to_string())
        .with_env("STRATA_WORKDIR", workdir.as_str())
}

fn image_record(name: &str, inputs: &BuildInputs, plan: &StagePlan) -> ImageRecord {
    let recipe = &inputs.recipe;
    ImageRecord {
        version: IMAGE_RECORD_VERSION,
        name: name.to_string(),
        base: recipe.base.to_string(),
        workdir: recipe.workdir.to_string(),
        entry: recipe.entry.argv().to_vec(),
        packages: recipe.packages.to_vec(),
        dependencies: inputs.manifest.declared_packages(),
        manifest: inputs.manifest.hash(),
        source: inputs.source.digest(),
        built_at: Utc::now(),
        env: recipe.entry.env().clone(),
        layers: plan
            .stages()
            .iter()
            .map(|s| ImageLayer {
                stage: s.stage,
                key: s.key.clone(),
            })
            .collect(),
    }
}

/// Last `n` non-empty lines of `text`
fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
