//! Launch Use Case
//!
//! Assembles an image's layers into a scratch root and starts its entry
//! command in the working directory.

use std::path::{Path, PathBuf};

use crate::domain::entities::ImageRecord;
use crate::domain::ports::{EntryLauncher, LayerStore, LockMode, PendingLayer};
use crate::domain::value_objects::{EntryCommand, Workdir, DEPENDENCY_DIR};
use crate::error::{StrataError, StrataResult};
use crate::infrastructure::fs::copy_tree;

/// Options for launching an image
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub name: String,
    /// Appended to the image's entry argv
    pub args: Vec<String>,
}

impl LaunchOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

/// Launch use case - run an image's entry command in the foreground
pub struct LaunchUseCase<S, L>
where
    S: LayerStore,
    L: EntryLauncher,
{
    store: S,
    launcher: L,
}

impl<S, L> LaunchUseCase<S, L>
where
    S: LayerStore,
    L: EntryLauncher,
{
    pub fn new(store: S, launcher: L) -> Self {
        Self { store, launcher }
    }

    /// Assemble and run; returns the entry process's exit code.
    ///
    /// The store lock is released once the root is assembled, so a
    /// long-running entry does not block builds.
    pub fn execute(&self, options: &LaunchOptions) -> StrataResult<i32> {
        let (image, root) = {
            let _lock = self.store.lock(LockMode::Shared)?;
            let image = self
                .store
                .image(&options.name)?
                .ok_or_else(|| StrataError::ImageNotFound {
                    name: options.name.clone(),
                })?;
            let root = self.assemble(&image)?;
            (image, root)
        };

        let entry = EntryCommand::new(image.entry.clone(), image.env.clone())?;
        let workdir = Workdir::parse(&image.workdir)?;
        let cwd = workdir.under(root.root());
        if let Some(script) = entry.script() {
            ensure_script(script, &workdir, root.root(), &cwd)?;
        }

        let mut argv = entry.argv().to_vec();
        argv.extend(options.args.iter().cloned());
        let mut env = entry.env().clone();
        let dependency_dir = workdir.under(root.root()).join(DEPENDENCY_DIR);
        env.insert(
            "PYTHONPATH".to_string(),
            entry.python_path(&dependency_dir.display().to_string()),
        );
        env.insert("STRATA_IMAGE".to_string(), image.name.clone());
        env.insert("STRATA_ROOT".to_string(), root.root().display().to_string());

        let code = self.launcher.launch(&argv, &cwd, &env)?;
        tracing::info!(image = %image.name, code, "entry process exited");
        Ok(code)
    }

    /// Copy every layer, in stage order, into a fresh scratch root
    fn assemble(&self, image: &ImageRecord) -> StrataResult<S::Pending> {
        let root = self.store.begin_run()?;
        for layer in &image.layers {
            if !self.store.contains(&layer.key) {
                return Err(StrataError::LayerMissing {
                    image: image.name.clone(),
                    key: layer.key.to_string(),
                });
            }
            copy_tree(&self.store.layer_root(&layer.key), root.root())?;
        }
        tracing::debug!(
            image = %image.name,
            layers = image.layers.len(),
            root = %root.root().display(),
            "image assembled"
        );
        Ok(root)
    }
}

/// Fail before spawning when the entry script is absent from the root
fn ensure_script(script: &str, workdir: &Workdir, root: &Path, cwd: &Path) -> StrataResult<()> {
    let path: PathBuf = match script.strip_prefix('/') {
        Some(absolute) => root.join(absolute),
        None => cwd.join(script),
    };
    if path.is_file() {
        Ok(())
    } else {
        Err(StrataError::EntryScriptNotFound {
            script: script.to_string(),
            workdir: PathBuf::from(workdir.as_str()),
        })
    }
}
