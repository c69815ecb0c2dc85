//! Prune options

/// Options for the prune command
#[derive(Debug, Clone, Default)]
pub struct PruneOptions {
    /// Report what would be removed without removing it
    pub dry_run: bool,
}

impl PruneOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
