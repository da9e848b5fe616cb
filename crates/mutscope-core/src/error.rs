//! Validation errors surfaced to callers.

use thiserror::Error;

/// Why a pair of sequences was rejected.
///
/// These are never retried; the message is meant to be shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Nothing left after stripping whitespace.
    #[error("sequence is empty")]
    EmptySequence,

    /// Symbols outside the 20-letter alphabet, in order of first appearance.
    #[error("{label} sequence contains invalid characters: {}", .symbols.iter().map(char::to_string).collect::<Vec<_>>().join(", "))]
    InvalidSymbols { label: String, symbols: Vec<char> },

    #[error("sequences have different lengths: original={original}, mutated={mutated}")]
    LengthMismatch { original: usize, mutated: usize },

    #[error("too many mutations found: {found}. Maximum allowed: {max}")]
    TooManyMutations { found: usize, max: usize },

    #[error("no differences found between the sequences")]
    NoDifference,
}

pub type Result<T> = std::result::Result<T, ValidationError>;
