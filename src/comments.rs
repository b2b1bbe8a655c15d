//! Comment styles and line uncommenting
//!
//! Solution templates mark optional code by commenting it out. A style is
//! learned from a sample line holding a placeholder where the code goes,
//! e.g. `// CODE` or `/* CODE */`, and is made of four parts:
//!
//! | Part | `// CODE` | `/* CODE */` |
//! |------|-----------|--------------|
//! | opening token | `//` | `/*` |
//! | padding after it | ` ` | ` ` |
//! | padding before the closing token | | ` ` |
//! | closing token | | `*/` |
//!
//! Both paddings are optional when uncommenting, so `//x` and `// x` both
//! become `x`.

use regex::Regex;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct CommentStyle {
    parts: [String; 4],
    pattern: Regex,
}

impl CommentStyle {
    /// Learn a style from a commented sample line.
    ///
    /// `placeholder` must appear exactly once in `commented_line`.
    pub fn detect(commented_line: &str, placeholder: &str) -> Result<Self> {
        if placeholder.is_empty() {
            return Err(Error::MalformedInput("empty placeholder".to_string()));
        }
        let pieces: Vec<&str> = commented_line.split(placeholder).collect();
        let [before, after] = pieces.as_slice() else {
            return Err(Error::MalformedInput(format!(
                "expected `{}` exactly once in {:?}",
                placeholder, commented_line
            )));
        };

        let opening = before.trim_start();
        let closing = after.trim_end();
        let start = opening.trim_end();
        let end = closing.trim_start();
        Self::from_parts(&[
            start,
            &opening[start.len()..],
            &closing[..closing.len() - end.len()],
            end,
        ])
    }

    /// Build a style from its four parts: opening token, padding after it,
    /// padding before the closing token, closing token.
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Result<Self> {
        let [start, start_pad, end_pad, end] = parts else {
            return Err(Error::MalformedInput(format!(
                "a comment style has 4 parts, got {}",
                parts.len()
            )));
        };
        let parts = [start, start_pad, end_pad, end].map(|p| p.as_ref().to_string());

        let pattern = format!(
            r"^(\s*){}(?:{})?(.*?)(?:{})?{}\s*?(\n?)$",
            regex::escape(&parts[0]),
            regex::escape(&parts[1]),
            regex::escape(&parts[2]),
            regex::escape(&parts[3]),
        );
        let pattern = Regex::new(&pattern).map_err(|e| Error::MalformedInput(e.to_string()))?;
        Ok(Self { parts, pattern })
    }

    pub fn parts(&self) -> [&str; 4] {
        [
            &self.parts[0],
            &self.parts[1],
            &self.parts[2],
            &self.parts[3],
        ]
    }

    /// Remove the comment markers from a single line.
    ///
    /// Indentation and a trailing newline are kept; trailing whitespace after
    /// the closing token is dropped. Lines that are not commented in this
    /// style are returned unchanged.
    pub fn uncomment(&self, line: &str) -> String {
        self.pattern.replace(line, "${1}${2}${3}").into_owned()
    }

    /// Uncomment every line of `text`, preserving line endings.
    pub fn uncomment_text(&self, text: &str) -> String {
        text.split_inclusive('\n')
            .map(|line| self.uncomment(line))
            .collect()
    }
}
