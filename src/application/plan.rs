//! Plan Use Case
//!
//! Dry run of a build:
//! 1. Load and validate inputs
//! 2. Derive cache keys for every stage
//! 3. Check which layers the store already has
//! 4. Compare against the previous image of the same name
//!
//! Nothing is executed and nothing is written.

use std::fs;
use std::path::{Path, PathBuf};

use crate::application::inputs::BuildInputs;
use crate::config::Config;
use crate::domain::entities::ImageRecord;
use crate::domain::ports::{LayerStore, LockMode};
use crate::domain::services::{plan_stages, StagePlan};
use crate::domain::value_objects::{StageKind, Workdir};
use crate::error::StrataResult;

/// Options for the plan operation
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Image name to compare against
    pub name: String,
    /// Plan as if the cache were empty
    pub no_cache: bool,
    /// Produce a unified diff of the dependency manifest
    pub manifest_diff: bool,
}

impl PlanOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            no_cache: false,
            manifest_diff: false,
        }
    }

    pub fn with_no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }

    pub fn with_manifest_diff(mut self, diff: bool) -> Self {
        self.manifest_diff = diff;
        self
    }
}

/// Result of the plan operation
#[derive(Debug, Clone)]
pub struct PlanResult {
    pub image: String,
    pub plan: StagePlan,
    /// Last successful build under the same name
    pub previous: Option<ImageRecord>,
    /// Unified diff of the manifest against the previous image
    pub manifest_diff: Option<String>,
    pub warnings: Vec<String>,
}

impl PlanResult {
    /// Stages whose key differs from the previous image (all of them when
    /// there is none)
    pub fn changed_stages(&self) -> Vec<StageKind> {
        self.plan
            .stages()
            .iter()
            .filter(|s| {
                self.previous
                    .as_ref()
                    .and_then(|prev| prev.layer_for(s.stage))
                    .map_or(true, |key| key != &s.key)
            })
            .map(|s| s.stage)
            .collect()
    }

    /// Whether a build would produce exactly the previous image
    pub fn is_up_to_date(&self) -> bool {
        self.plan.build_count() == 0 && self.changed_stages().is_empty()
    }
}

/// Plan Use Case
///
/// Shares the key derivation with the build use case, so a stage reported
/// as cached here is skipped by the next build.
pub struct PlanUseCase<S>
where
    S: LayerStore,
{
    store: S,
}

impl<S> PlanUseCase<S>
where
    S: LayerStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load inputs from `context` and plan
    pub fn execute_context(
        &self,
        context: &Path,
        config: &Config,
        options: &PlanOptions,
    ) -> StrataResult<PlanResult> {
        let exclude = vec![self.store.location().to_path_buf()];
        let inputs = BuildInputs::load(context, config, &exclude)?;
        self.execute(&inputs, options)
    }

    pub fn execute(&self, inputs: &BuildInputs, options: &PlanOptions) -> StrataResult<PlanResult> {
        let _lock = self.store.lock(LockMode::Shared)?;

        let plan = plan_stages(&inputs.recipe, &inputs.manifest, &inputs.source)
            .resolve_cache(options.no_cache, |key| self.store.contains(key));
        let previous = self.store.image(&options.name)?;

        let manifest_diff = match (&previous, options.manifest_diff) {
            (Some(prev), true) if prev.manifest != inputs.manifest.hash() => {
                Some(self.manifest_diff(prev, inputs))
            }
            _ => None,
        };

        tracing::debug!(
            image = %options.name,
            build = plan.build_count(),
            cached = plan.cached_count(),
            "plan resolved"
        );

        Ok(PlanResult {
            image: options.name.clone(),
            plan,
            previous,
            manifest_diff,
            warnings: inputs.entry_script_warning().into_iter().collect(),
        })
    }

    fn manifest_diff(&self, previous: &ImageRecord, inputs: &BuildInputs) -> String {
        let name = inputs.manifest.path().display().to_string();
        let old = self
            .previous_manifest_path(previous, &inputs.manifest.file_name())
            .and_then(|path| fs::read_to_string(path).ok())
            .unwrap_or_default();
        generate_diff(&name, &old, inputs.manifest.content())
    }

    /// Staged manifest inside the previous image's manifest layer
    fn previous_manifest_path(&self, previous: &ImageRecord, file_name: &str) -> Option<PathBuf> {
        let key = previous.layer_for(StageKind::StageManifest)?;
        let workdir = Workdir::parse(&previous.workdir).ok()?;
        let path = workdir.under(&self.store.layer_root(key)).join(file_name);
        path.is_file().then_some(path)
    }
}

fn generate_diff(name: &str, old: &str, new: &str) -> String {
    similar::TextDiff::from_lines(old, new)
        .unified_diff()
        .header(&format!("a/{}", name), &format!("b/{}", name))
        .to_string()
}
