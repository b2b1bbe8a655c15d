//! Error types shared by the listing, rendering and comment helpers

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// An ignore-aware listing was requested outside a git working tree.
    #[error("not a git repository: {}", .0.display())]
    NotRepo(PathBuf),

    /// `git` could not be started, or exited with a code we don't interpret.
    #[error("`{command}` failed: {detail}")]
    ToolInvocation { command: String, detail: String },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("gitignore error: {0}")]
    Ignore(#[from] ignore::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
