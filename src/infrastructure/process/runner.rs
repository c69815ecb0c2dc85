//! Shell command runner

use std::process::{Command, Stdio};

use crate::domain::ports::{CommandRunner, Invocation, RunOutcome, RunnerError};

/// Runs stage commands as `<shell> -c <script>`, capturing output
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
}

impl ShellRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new("/bin/sh")
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunOutcome, RunnerError> {
        tracing::debug!(
            shell = %self.shell,
            cwd = %invocation.cwd.display(),
            "running: {}",
            invocation.script
        );

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(&invocation.script)
            .current_dir(&invocation.cwd)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| RunnerError {
                program: self.shell.clone(),
                source,
            })?;

        let outcome = RunOutcome {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(status = outcome.status, "command finished");
        Ok(outcome)
    }
}
