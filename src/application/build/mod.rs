//! Build Use Case
//!
//! Runs the provisioning pipeline:
//! - Loading and validating every input up front
//! - Planning stage keys and resolving cache hits
//! - Running each missing stage in a scratch layer and committing it
//! - Writing the image record once every stage has succeeded

mod options;
mod result;
mod use_case;


pub use options::BuildOptions;
pub use result::BuildResult;
pub use use_case::BuildUseCase;
