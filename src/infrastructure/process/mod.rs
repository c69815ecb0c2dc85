//! Child process implementations

mod launcher;
mod runner;

pub use launcher::ProcessLauncher;
pub use runner::ShellRunner;
