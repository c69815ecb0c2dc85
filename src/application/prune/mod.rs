//! Prune use case
//!
//! Removes layers no image references and scratch roots left behind by
//! interrupted builds.

mod options;
mod result;
mod use_case;

pub use options::PruneOptions;
pub use result::PruneResult;
pub use use_case::PruneUseCase;
