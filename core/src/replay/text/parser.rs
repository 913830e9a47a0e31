//! Text recording parser
//!
//! Tokenizes on `,` then `:` and checks each entry against
//! `frame ':' button (':' 'release')?`. Parsing is all-or-nothing: the first
//! bad entry fails the whole input.

use smallvec::SmallVec;
use std::io;
use std::path::{Path, PathBuf};

use crate::replay::types::{Button, Edge, EdgeAction};

/// Parse errors
///
/// `index` is the zero-based position of the offending entry in the
/// comma-separated list (comment and blank lines are not counted).
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Frame is empty, negative, non-numeric or does not fit in a u64
    #[error("entry {index}: invalid frame '{token}'")]
    InvalidFrame { index: usize, token: String },
    /// Button token is neither a canonical name nor an alias
    #[error("entry {index}: unknown button '{token}'")]
    UnknownButton { index: usize, token: String },
    /// Wrong number of `:`-separated tokens or an unknown suffix
    #[error("entry {index}: malformed entry '{entry}' (expected frame:button[:release])")]
    MalformedEntry { index: usize, entry: String },
    /// Recording file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ParseError {
    /// Index of the offending entry, if the error came from the text itself
    pub fn entry_index(&self) -> Option<usize> {
        match self {
            ParseError::InvalidFrame { index, .. }
            | ParseError::UnknownButton { index, .. }
            | ParseError::MalformedEntry { index, .. } => Some(*index),
            ParseError::Io { .. } => None,
        }
    }
}

/// Parse a comma-joined recording string
///
/// Whitespace-only input is an empty recording.
pub fn parse(text: &str) -> Result<Vec<Edge>, ParseError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    text.split(',')
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry))
        .collect()
}

/// Parse the line-oriented form
///
/// Blank lines and lines starting with `#` are dropped, the rest are joined
/// with `,` and parsed as one string.
pub fn parse_lines(text: &str) -> Result<Vec<Edge>, ParseError> {
    let joined = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join(",");
    parse(&joined)
}

/// Read and parse a recording file (line-oriented form)
pub fn load_file(path: &Path) -> Result<Vec<Edge>, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_lines(&content)
}

fn parse_entry(index: usize, entry: &str) -> Result<Edge, ParseError> {
    let tokens: SmallVec<[&str; 3]> = entry.split(':').map(str::trim).collect();

    let (frame_token, button_token, action) = match tokens.as_slice() {
        [frame, button] => (*frame, *button, EdgeAction::Press),
        [frame, button, suffix] if suffix.eq_ignore_ascii_case("release") => {
            (*frame, *button, EdgeAction::Release)
        }
        _ => {
            return Err(ParseError::MalformedEntry {
                index,
                entry: entry.trim().to_string(),
            });
        }
    };

    let frame = parse_frame(frame_token).ok_or_else(|| ParseError::InvalidFrame {
        index,
        token: frame_token.to_string(),
    })?;

    let button = Button::from_token(button_token).ok_or_else(|| ParseError::UnknownButton {
        index,
        token: button_token.to_string(),
    })?;

    Ok(Edge {
        frame,
        button,
        action,
    })
}

/// Digits only: rejects signs, so `-5` and `+5` are both invalid
fn parse_frame(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
