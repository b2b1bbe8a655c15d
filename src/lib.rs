//! qbuild - filesystem and git helpers for assembling challenge builds
//!
//! Lists directory trees with `.gitignore` filtering, draws tree diagrams and
//! strips comment markers from template lines.

pub mod comments;
pub mod error;
pub mod git;
pub mod output;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use comments::CommentStyle;
pub use error::{Error, Result};
pub use git::{GitCommand, IgnoreOracle, NativeIgnore};
pub use output::{Listing, OutputConfig, TreeFormatter, print_json, render};
pub use tree::{PathFilter, TreeWalker, WalkEntry, WalkerConfig};

