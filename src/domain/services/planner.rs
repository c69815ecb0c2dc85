//! Stage planning service
//!
//! Pure domain logic that turns a recipe, manifest and source tree into the
//! ordered list of stages with their cache keys. No I/O happens here; the
//! build use case decides from the plan what to execute.

use crate::domain::entities::{Manifest, Recipe, SourceTree};
use crate::domain::value_objects::{CacheKey, ContentHash, InputDigest, StageKind};

/// What to do with a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAction {
    /// A layer with this key is already committed
    Cached,
    /// The stage has to run
    Build,
}

/// One stage of a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStage {
    pub stage: StageKind,
    /// Digest of this stage's own inputs
    pub input: ContentHash,
    pub parent: Option<CacheKey>,
    pub key: CacheKey,
    pub action: StageAction,
}

impl PlannedStage {
    pub fn is_cached(&self) -> bool {
        self.action == StageAction::Cached
    }
}

/// All seven stages in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    stages: Vec<PlannedStage>,
}

impl StagePlan {
    pub fn stages(&self) -> &[PlannedStage] {
        &self.stages
    }

    pub fn get(&self, stage: StageKind) -> Option<&PlannedStage> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    pub fn top_key(&self) -> Option<&CacheKey> {
        self.stages.last().map(|s| &s.key)
    }

    pub fn cached_count(&self) -> usize {
        self.stages.iter().filter(|s| s.is_cached()).count()
    }

    pub fn build_count(&self) -> usize {
        self.stages.len() - self.cached_count()
    }

    /// Mark stages cached while `is_committed` holds.
    ///
    /// The first miss turns every later stage into a build, even if a layer
    /// with its key happens to exist: a layer is only reusable together with
    /// all of its ancestors.
    pub fn resolve_cache<F>(mut self, no_cache: bool, mut is_committed: F) -> Self
    where
        F: FnMut(&CacheKey) -> bool,
    {
        let mut hit = !no_cache;
        for stage in &mut self.stages {
            hit = hit && is_committed(&stage.key);
            stage.action = if hit {
                StageAction::Cached
            } else {
                StageAction::Build
            };
        }
        self
    }
}

/// Input digest of a single stage
pub fn stage_input(
    stage: StageKind,
    recipe: &Recipe,
    manifest: &Manifest,
    source: &SourceTree,
) -> ContentHash {
    let digest = InputDigest::new();
    match stage {
        StageKind::Base => digest.field("base", recipe.base.as_str()).finish(),
        StageKind::Workdir => digest.field("workdir", recipe.workdir.as_str()).finish(),
        StageKind::SystemPackages => {
            let mut digest = digest;
            for package in recipe.packages.iter() {
                digest.push("package", package);
            }
            digest
                .field("install", &recipe.system_install)
                .field("clean", &recipe.system_clean)
                .finish()
        }
        StageKind::StageManifest => digest
            .field("path", &recipe.staged_manifest())
            .field("content", manifest.hash().as_str())
            .finish(),
        StageKind::InstallDependencies => digest
            .field("install", &recipe.dependency_install)
            .finish(),
        StageKind::StageSource => digest
            .field("workdir", recipe.workdir.as_str())
            .field("tree", source.digest().as_str())
            .finish(),
        StageKind::Entry => {
            let mut digest = digest;
            for arg in recipe.entry.argv() {
                digest.push("arg", arg);
            }
            for (name, value) in recipe.entry.env() {
                digest.push("env", &format!("{}={}", name, value));
            }
            digest.finish()
        }
    }
}

/// Compute every stage key. All stages start out as [`StageAction::Build`].
pub fn plan_stages(recipe: &Recipe, manifest: &Manifest, source: &SourceTree) -> StagePlan {
    let mut stages = Vec::with_capacity(StageKind::ORDER.len());
    let mut parent: Option<CacheKey> = None;

    for stage in StageKind::ORDER {
        let input = stage_input(stage, recipe, manifest, source);
        let key = CacheKey::derive(parent.as_ref(), stage, &input);
        stages.push(PlannedStage {
            stage,
            input,
            parent: parent.clone(),
            key: key.clone(),
            action: StageAction::Build,
        });
        parent = Some(key);
    }

    StagePlan { stages }
}
