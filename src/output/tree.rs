//! Tree formatter for directory diagrams
//!
//! Reads the filesystem directly and draws the hierarchy with box-drawing
//! connectors. Directories come before files, each group sorted by name.
//! No ignore rules apply here, so `.git` shows up like any other directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use termcolor::{Color, ColorChoice, NoColor, StandardStream, WriteColor};

use crate::error::Result;

use super::config::OutputConfig;
use super::utils::{connector, continuation_prefix, cwrite};

/// Render `path` as a tree diagram, labelling the root with `root_label`
/// (or the path's file name).
///
/// ```no_run
/// let diagram = qbuild::render(std::path::Path::new("statement"), None)?;
/// print!("{}", diagram);
/// # Ok::<(), qbuild::Error>(())
/// ```
pub fn render(path: &Path, root_label: Option<&str>) -> Result<String> {
    TreeFormatter::new(OutputConfig {
        use_color: false,
        root_label: root_label.map(str::to_string),
    })
    .format(path)
}

/// Formatter for tree diagrams.
pub struct TreeFormatter {
    config: OutputConfig,
}

impl TreeFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Format the tree as plain text, ending in exactly one newline.
    pub fn format(&self, path: &Path) -> Result<String> {
        let mut out = NoColor::new(Vec::new());
        self.write_tree(&mut out, path)?;
        let text = String::from_utf8_lossy(&out.into_inner()).into_owned();
        Ok(format!("{}\n", text.trim_end()))
    }

    /// Print the tree to stdout, coloring directories when enabled.
    pub fn print(&self, path: &Path) -> Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write_tree(&mut stdout, path)
    }

    /// Write the tree rooted at `path` to any color-capable writer.
    pub fn write_tree<W: WriteColor>(&self, out: &mut W, path: &Path) -> Result<()> {
        // Fail early on a missing root
        fs::symlink_metadata(path)?;
        let label = match &self.config.root_label {
            Some(label) => label.clone(),
            None => display_name(path),
        };
        self.write_node(out, path, &label, "")
    }

    fn write_node<W: WriteColor>(
        &self,
        out: &mut W,
        path: &Path,
        label: &str,
        prefix: &str,
    ) -> Result<()> {
        // Symlinked directories are drawn as leaves
        let is_dir = !path.is_symlink() && path.is_dir();
        if is_dir {
            cwrite(out, label, Some(Color::Blue), true)?;
        } else {
            cwrite(out, label, None, false)?;
        }
        writeln!(out)?;

        if !is_dir {
            return Ok(());
        }

        let (dirs, files) = read_children(path)?;
        let total = dirs.len() + files.len();
        for (i, (name, child)) in dirs.into_iter().chain(files).enumerate() {
            let is_last = i + 1 == total;
            write!(out, "{}{}", prefix, connector(is_last))?;
            let child_prefix = continuation_prefix(prefix, is_last);
            self.write_node(out, &child, &name, &child_prefix)?;
        }
        Ok(())
    }
}

type Children = Vec<(String, PathBuf)>;

/// Split a directory's entries into sorted (directories, files).
fn read_children(path: &Path) -> io::Result<(Children, Children)> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let child = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if child.is_dir() {
            dirs.push((name, child));
        } else {
            files.push((name, child));
        }
    }
    dirs.sort();
    files.sort();
    Ok((dirs, files))
}

/// The final path component, or the path as written when there is none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
