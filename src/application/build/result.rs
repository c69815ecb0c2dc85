//! Build result types

use crate::domain::entities::ImageRecord;
use crate::domain::services::StagePlan;

/// Result of a successful build
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// The record that was written
    pub image: ImageRecord,
    /// Plan with per-stage cache decisions
    pub plan: StagePlan,
    /// Non-fatal problems found while building
    pub warnings: Vec<String>,
}

impl BuildResult {
    pub fn built_count(&self) -> usize {
        self.plan.build_count()
    }

    pub fn cached_count(&self) -> usize {
        self.plan.cached_count()
    }

    /// True when nothing had to run
    pub fn fully_cached(&self) -> bool {
        self.built_count() == 0
    }
}
