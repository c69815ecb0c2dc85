//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

pub mod command_template;
mod planner;
mod render;
pub mod requirements;

pub use command_template::{expand, TemplateVars};
pub use planner::{plan_stages, stage_input, PlannedStage, StageAction, StagePlan};
pub use render::render_build_file;
pub use requirements::{normalize_name, parse_manifest, ManifestLine, Requirement};
