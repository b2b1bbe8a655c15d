//! Path exclusion for ignore-aware walking

use std::path::Path;

use crate::error::Result;
use crate::git::{GitCommand, IgnoreOracle};

/// Name of git's metadata directory, never listed.
pub const METADATA_DIR: &str = ".git";

/// Name of the ignore file, always listed.
pub const IGNORE_FILE: &str = ".gitignore";

/// Decides whether a path is left out of an ignore-aware listing.
///
/// Wraps an [`IgnoreOracle`] so the walker can run against the `git`
/// executable or the in-process matcher.
pub struct PathFilter(Box<dyn IgnoreOracle>);

impl PathFilter {
    pub fn new(oracle: impl IgnoreOracle + 'static) -> Self {
        Self(Box::new(oracle))
    }

    /// Check that `path` is a directory inside a git working tree.
    pub fn is_repo_root(&self, path: &Path) -> Result<bool> {
        Ok(path.is_dir() && self.0.is_repo(path)?)
    }

    /// Ask the oracle whether `path` is ignored, as seen from `cwd`.
    pub fn is_ignored(&self, path: &Path, cwd: &Path) -> Result<bool> {
        self.0.is_ignored(path, cwd)
    }

    /// Check if a path should be left out of the listing.
    ///
    /// `.git` is excluded and a `.gitignore` file is kept without asking
    /// the oracle; everything else follows the ignore rules.
    pub fn excludes(&self, path: &Path, is_dir: bool, cwd: &Path) -> Result<bool> {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(METADATA_DIR) => Ok(true),
            Some(IGNORE_FILE) if !is_dir => Ok(false),
            _ => self.is_ignored(path, cwd),
        }
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new(GitCommand::new())
    }
}
