//! Build options

/// Options for the build command
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Image name to record
    pub name: String,
    /// Rebuild every stage even if its layer is committed
    pub no_cache: bool,
}

impl BuildOptions {
    /// Create new build options
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            no_cache: false,
        }
    }

    /// Set no-cache
    pub fn with_no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }
}
