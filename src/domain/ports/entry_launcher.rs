//! EntryLauncher port - starts the entry process in the foreground

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::StrataResult;

/// Runs the entry argv to completion and reports its exit code.
///
/// Implementations:
/// - `ProcessLauncher` - spawns the program directly with inherited stdio
pub trait EntryLauncher {
    fn launch(&self, argv: &[String], cwd: &Path, env: &BTreeMap<String, String>)
        -> StrataResult<i32>;
}
