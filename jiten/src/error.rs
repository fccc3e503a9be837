//! Pipeline errors.
//!
//! These are hard failures: a broken morpheme stream or a dictionary entry
//! violating its own invariants means the result cannot be trusted, so the
//! pipeline refuses to emit partial output.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The analyzer produced segments that do not tile the input text.
    MorphemeStream { index: usize, reason: String },
    /// The resolved spans do not tile the input text. Indicates a resolver
    /// bug rather than bad input.
    Coverage { position: usize, reason: String },
    /// A dictionary entry is internally inconsistent (no readings, say).
    DictionaryIntegrity { entry_id: u32, reason: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MorphemeStream { index, reason } => {
                write!(f, "invalid morpheme stream at segment {index}: {reason}")
            }
            ParseError::Coverage { position, reason } => {
                write!(f, "span covering broken at byte {position}: {reason}")
            }
            ParseError::DictionaryIntegrity { entry_id, reason } => {
                write!(f, "dictionary entry {entry_id} is inconsistent: {reason}")
            }
        }
    }
}

impl std::error::Error for ParseError {}
