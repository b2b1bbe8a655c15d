//! JSON output formatting

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A walk result as written by `qbuild ls --json`.
#[derive(Debug, Serialize)]
pub struct Listing<'a> {
    pub root: &'a Path,
    pub paths: &'a [PathBuf],
}

/// Print a listing as pretty-printed JSON to stdout.
pub fn print_json(listing: &Listing<'_>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(listing).map_err(io::Error::other)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)
}
