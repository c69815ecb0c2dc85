//! Shared setup for command handlers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use strata::config::{Config, LoadedConfig};
use strata::infrastructure::{FsLayerStore, ShellRunner};

/// A build context and the recipe that applies to it
pub struct CommandContext {
    pub context: PathBuf,
    pub loaded: LoadedConfig,
}

impl CommandContext {
    pub fn load(context: &Path) -> Result<Self> {
        if !context.is_dir() {
            bail!("build context {} is not a directory", context.display());
        }
        let loaded = Config::load_for_context(context)?;
        Ok(Self {
            context: context.to_path_buf(),
            loaded,
        })
    }

    pub fn config(&self) -> &Config {
        &self.loaded.config
    }

    /// `tag` if given, else the configured or directory-derived name
    pub fn image_name(&self, tag: Option<String>) -> String {
        match tag {
            Some(tag) => strata::config::sanitize_image_name(&tag),
            None => self.config().image_name(&self.context),
        }
    }

    pub fn open_store(&self) -> Result<FsLayerStore> {
        open_store(self.config())
    }

    pub fn runner(&self) -> ShellRunner {
        ShellRunner::new(self.config().store.shell.clone())
    }
}

/// Store for commands that do not need a build context
pub fn store_from_cwd() -> Result<FsLayerStore> {
    let loaded = Config::load_for_context(Path::new("."))?;
    open_store(&loaded.config)
}

fn open_store(config: &Config) -> Result<FsLayerStore> {
    let path = config.store_path();
    FsLayerStore::open(&path)
        .with_context(|| format!("failed to open layer store at {}", path.display()))
}
