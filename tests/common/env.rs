//! Test environment builder for isolated Strata testing.
//!
//! Provides `TestEnv` - a build context, a private layer store and a home
//! directory in temp dirs, plus helpers to run the Strata CLI against them.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use super::fixtures::{BOT_SCRIPT, OFFLINE_RECIPE, REQUIREMENTS};

/// Result of running a Strata CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Check if command succeeded
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as NDJSON
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| l.trim_start().starts_with('{'))
            .map(|l| serde_json::from_str(l).expect("stdout line is not JSON"))
            .collect()
    }
}

/// Isolated test environment with temp directories.
pub struct TestEnv {
    /// Build context
    pub context: TempDir,
    /// Layer store (passed via STRATA_STORE)
    pub store: TempDir,
    /// HOME / XDG_CONFIG_HOME so no user config leaks in
    pub home: TempDir,
    strata_bin: PathBuf,
}

impl TestEnv {
    /// Create a new TestEnvBuilder
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::new()
    }

    /// Context with the offline recipe, requirements and bot script
    pub fn bot() -> Self {
        Self::builder().build()
    }

    /// Get path relative to the build context
    pub fn context_path(&self, relative: &str) -> PathBuf {
        self.context.path().join(relative)
    }

    /// Get path relative to the layer store
    pub fn store_path(&self, relative: &str) -> PathBuf {
        self.store.path().join(relative)
    }

    /// Run strata from the build context
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_from(self.context.path(), args)
    }

    /// Run strata from a specific directory
    pub fn run_from(&self, cwd: &Path, args: &[&str]) -> TestResult {
        self.run_from_with_env(cwd, args, &[])
    }

    /// Run strata from the build context with extra env vars.
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        self.run_from_with_env(self.context.path(), args, env_vars)
    }

    pub fn run_from_with_env(
        &self,
        cwd: &Path,
        args: &[&str],
        env_vars: &[(&str, &str)],
    ) -> TestResult {
        let mut cmd = Command::new(&self.strata_bin);
        cmd.current_dir(cwd)
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env("STRATA_STORE", self.store.path())
            .env("NO_COLOR", "1")
            .env_remove("STRATA_LOG")
            .env_remove("STRATA_SHELL");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute strata");
        output_to_result(output)
    }

    /// Write a file into the build context
    pub fn write_context_file(&self, relative_path: &str, content: &str) {
        let full_path = self.context_path(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
    }

    /// Rename a file inside the build context
    pub fn rename_context_file(&self, from: &str, to: &str) {
        std::fs::rename(self.context_path(from), self.context_path(to))
            .expect("Failed to rename file");
    }

    /// Number of committed layers in the store
    pub fn layer_count(&self) -> usize {
        std::fs::read_dir(self.store_path("layers"))
            .map(|entries| entries.flatten().count())
            .unwrap_or(0)
    }

    /// Whether an image record exists in the store
    pub fn has_image(&self, name: &str) -> bool {
        self.store_path(&format!("images/{}.toml", name)).is_file()
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Builder for TestEnv with fluent API
pub struct TestEnvBuilder {
    recipe: Option<String>,
    files: Vec<(String, String)>,
}

impl TestEnvBuilder {
    /// Offline recipe, pinned requirements and the bot script
    pub fn new() -> Self {
        Self {
            recipe: Some(OFFLINE_RECIPE.to_string()),
            files: vec![
                ("requirements.txt".to_string(), REQUIREMENTS.to_string()),
                ("telegram_bot.py".to_string(), BOT_SCRIPT.to_string()),
            ],
        }
    }

    /// Replace strata.toml content
    pub fn with_recipe(mut self, toml: &str) -> Self {
        self.recipe = Some(toml.to_string());
        self
    }

    /// Do not write strata.toml (built-in defaults apply)
    pub fn without_recipe(mut self) -> Self {
        self.recipe = None;
        self
    }

    /// Add or replace a context file
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.retain(|(p, _)| p != path);
        self.files.push((path.to_string(), content.to_string()));
        self
    }

    /// Drop a default context file
    pub fn without_file(mut self, path: &str) -> Self {
        self.files.retain(|(p, _)| p != path);
        self
    }

    /// Build the TestEnv
    pub fn build(self) -> TestEnv {
        let env = TestEnv {
            context: TempDir::new().expect("Failed to create context temp dir"),
            store: TempDir::new().expect("Failed to create store temp dir"),
            home: TempDir::new().expect("Failed to create home temp dir"),
            strata_bin: PathBuf::from(env!("CARGO_BIN_EXE_strata")),
        };

        if let Some(recipe) = &self.recipe {
            env.write_context_file("strata.toml", recipe);
        }
        for (path, content) in &self.files {
            env.write_context_file(path, content);
        }
        env
    }
}

impl Default for TestEnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}
