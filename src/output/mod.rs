//! Tree and listing display
//!
//! - `tree` - box-drawing diagrams of a directory
//! - `json` - JSON listing output
//! - `utils` - connectors, prefixes and colored writes

mod config;
mod json;
mod tree;
mod utils;

pub use config::OutputConfig;
pub use json::{Listing, print_json};
pub use tree::{TreeFormatter, render};
pub use utils::{connector, continuation_prefix, cprintln, cwrite};
