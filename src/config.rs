//! Run configuration shared by resolution, execution and reporting.

use std::path::{Path, PathBuf};

/// Configuration for resolving sources and reporting results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Base directory for relative tabular file paths.
    pub fixture_root: PathBuf,
    /// Colorize console reports.
    pub use_colors: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fixture_root: PathBuf::from("."),
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl RunConfig {
    pub fn with_fixture_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.fixture_root = root.into();
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Resolves `path` against the fixture root. Absolute paths pass through.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.fixture_root.join(path)
        }
    }
}
