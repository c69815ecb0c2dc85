//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `BuildUseCase` - Run the stage pipeline and record the image
//! - `PlanUseCase` - Dry run: cache status per stage, changes since the last build
//! - `LaunchUseCase` - Assemble an image and run its entry command
//! - `PruneUseCase` - Remove unreferenced layers and abandoned scratch roots
//! - `ImagesUseCase` - List and inspect recorded images

pub mod build;
pub mod images;
pub mod inputs;
pub mod launch;
pub mod plan;
pub mod prune;

pub use build::{BuildOptions, BuildResult, BuildUseCase};
pub use images::{ImageDetails, ImagesUseCase, LayerDetails};
pub use inputs::{load_manifest, load_source, resolve_recipe, BuildInputs};
pub use launch::{LaunchOptions, LaunchUseCase};
pub use plan::{PlanOptions, PlanResult, PlanUseCase};
pub use prune::{PruneOptions, PruneResult, PruneUseCase};
