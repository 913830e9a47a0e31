//! Text recording format
//!
//! Recordings are a comma-separated list of `frame:button[:release]`
//! entries, designed for:
//! - Hand-written test inputs passed on the command line
//! - Diffable, editable recording files
//!
//! # Example
//!
//! ```text
//! 100:start,150:start:release,200:x,210:x:release
//! ```
//!
//! Button tokens are case-insensitive and may use aliases (`x` for `cross`);
//! the serializer always writes canonical names.
//!
//! The line-oriented form puts one entry per line and ignores blank lines and
//! lines starting with `#`:
//!
//! ```text
//! # boot, then confirm on the title screen
//! 100:start
//! 150:start:release
//! ```

mod parser;
mod serializer;

pub use parser::{ParseError, load_file, parse, parse_lines};
pub use serializer::{serialize, serialize_lines};
