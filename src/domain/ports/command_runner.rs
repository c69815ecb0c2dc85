//! CommandRunner port - runs the install commands of a stage

use std::path::PathBuf;

/// A shell command to run for a stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Command line, already expanded
    pub script: String,
    pub cwd: PathBuf,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(script: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            cwd: cwd.into(),
            env: Vec::new(),
        }
    }

    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((name.into(), value.into()));
        self
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOutcome {
    /// Exit code; `-1` when the process was killed by a signal
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// The command could not be started at all
#[derive(Debug)]
pub struct RunnerError {
    pub program: String,
    pub source: std::io::Error,
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to start '{}': {}", self.program, self.source)
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Runs stage commands
///
/// Implementations:
/// - `ShellRunner` - `<shell> -c <script>` with captured output
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunOutcome, RunnerError>;
}
