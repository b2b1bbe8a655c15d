//! Directory tree walking logic
//!
//! `TreeWalker` flattens a directory subtree into an ordered list of paths,
//! optionally honoring `.gitignore` through a [`PathFilter`].

mod config;
mod filter;
mod walker;

pub use config::WalkerConfig;
pub use filter::{IGNORE_FILE, METADATA_DIR, PathFilter};
pub use walker::{TreeWalker, WalkEntry};
