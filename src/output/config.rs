//! Output configuration types

/// Configuration for output formatting.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Label for the root line instead of the root's file name.
    pub root_label: Option<String>,
}
