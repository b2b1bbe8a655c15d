//! Shared utility functions for output formatting

use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

/// Connector drawn in front of a tree entry.
pub fn connector(is_last: bool) -> &'static str {
    if is_last { "└── " } else { "├── " }
}

/// Calculate the prefix for lines below an entry.
pub fn continuation_prefix(prefix: &str, is_last: bool) -> String {
    if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    }
}

/// Write `text` in `color` (plain when `None`), then reset the stream.
pub fn cwrite<W: WriteColor>(
    out: &mut W,
    text: &str,
    color: Option<Color>,
    bold: bool,
) -> io::Result<()> {
    if color.is_some() || bold {
        out.set_color(ColorSpec::new().set_fg(color).set_bold(bold))?;
    }
    write!(out, "{}", text)?;
    out.reset()
}

/// Like [`cwrite`], followed by a newline.
pub fn cprintln<W: WriteColor>(out: &mut W, text: &str, color: Option<Color>) -> io::Result<()> {
    cwrite(out, text, color, false)?;
    writeln!(out)
}
