//! Foreground entry process launcher

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use crate::domain::ports::EntryLauncher;
use crate::error::{StrataError, StrataResult};

/// Spawns the entry argv directly (no shell) with inherited stdio.
///
/// While the child runs, Ctrl-C is ignored by this process so the signal is
/// handled by the child alone and its exit status is what we report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl EntryLauncher for ProcessLauncher {
    fn launch(
        &self,
        argv: &[String],
        cwd: &Path,
        env: &BTreeMap<String, String>,
    ) -> StrataResult<i32> {
        let (program, args) = argv.split_first().ok_or(StrataError::UndefinedEntry)?;

        // A handler may already be installed (second launch in one process)
        if let Err(e) = ctrlc::set_handler(|| {}) {
            tracing::debug!("interrupt handler not installed: {}", e);
        }

        tracing::info!(program = %program, cwd = %cwd.display(), "starting entry process");
        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .envs(env)
            .status()
            .map_err(|source| StrataError::LaunchFailed {
                program: program.clone(),
                source,
            })?;

        Ok(exit_code(status))
    }
}

#[cfg(unix)]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
