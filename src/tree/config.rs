//! Configuration types for tree walkers

/// Output-shaping and filtering options for [`TreeWalker`](super::TreeWalker).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkerConfig {
    /// Emit paths relative to the walk root instead of root-prefixed paths.
    pub relative: bool,
    /// Suppress directory paths from the output (they are still traversed).
    pub only_files: bool,
    /// Skip paths ignored by `.gitignore`. The root must be inside a git working tree.
    pub use_gitignore: bool,
}
