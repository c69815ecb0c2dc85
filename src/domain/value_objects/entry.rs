//! Entry command value object

use std::collections::BTreeMap;

use crate::error::{StrataError, StrataResult};

/// The argv the container runs as its foreground process, plus the
/// environment it is started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCommand {
    argv: Vec<String>,
    env: BTreeMap<String, String>,
}

impl EntryCommand {
    pub fn new(argv: Vec<String>, env: BTreeMap<String, String>) -> StrataResult<Self> {
        match argv.first() {
            Some(program) if !program.trim().is_empty() => Ok(Self { argv, env }),
            _ => Err(StrataError::UndefinedEntry),
        }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// The script the interpreter is asked to run, if any.
    ///
    /// This is the first argument that is not a flag. Arguments following
    /// `-m` or `-c` name a module or inline code, not a file, so an entry
    /// like `python -m bot` has no script.
    pub fn script(&self) -> Option<&str> {
        let mut args = self.args().iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-m" | "-c" => return None,
                flag if flag.starts_with('-') => continue,
                script => return Some(script),
            }
        }
        None
    }

    /// `PYTHONPATH` with `dependency_dir` ahead of any path the entry sets
    pub fn python_path(&self, dependency_dir: &str) -> String {
        match self.env.get("PYTHONPATH").filter(|p| !p.is_empty()) {
            Some(existing) => format!("{}:{}", dependency_dir, existing),
            None => dependency_dir.to_string(),
        }
    }

    /// JSON-array form used in exec-style CMD lines
    pub fn exec_form(&self) -> String {
        let quoted: Vec<String> = self
            .argv
            .iter()
            .map(|arg| serde_json::Value::String(arg.clone()).to_string())
            .collect();
        format!("[{}]", quoted.join(", "))
    }
}
