//! Grammar-construction-time errors.
//!
//! These are distinct from parse failure: a malformed character-class
//! descriptor or a rule referenced but never defined are defects in the
//! grammar itself, discovered while *building* it, not while running it
//! against input. They therefore get the usual `thiserror`-derived
//! `Result`-returning treatment rather than the silent `Option` channel used
//! by [`crate::expr::Expr::eval`]: `thiserror` for construction/validation
//! errors, a separate success/failure channel for the hot parsing path
//! itself.

use thiserror::Error;

/// A character-class descriptor string (`"0-9a-z^"`, see [`crate::bitset`])
/// was malformed.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CharClassError {
    /// A byte in the descriptor was outside the ASCII range this class type
    /// supports.
    #[error("character class descriptor contains non-ASCII byte {byte:#04x} at position {position}")]
    NonAscii {
        /// The offending byte.
        byte: u8,
        /// Its position within the descriptor string.
        position: usize,
    },

    /// A `lo-hi` range had `lo > hi`.
    #[error("character class range '{lo}-{hi}' is inverted (start is after end)")]
    InvertedRange {
        /// The range's low bound, as written.
        lo: char,
        /// The range's high bound, as written.
        hi: char,
    },

    /// The descriptor ended with a dangling `-` that introduced no range.
    #[error("character class descriptor ends with a dangling '-'")]
    TrailingDash,
}

/// A non-terminal ([`crate::rule::Rule`]) was used incorrectly while
/// assembling a grammar.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RuleError {
    /// [`crate::rule::define_rule`] was called twice for the same rule.
    #[error("rule '{0}' was defined more than once")]
    AlreadyDefined(&'static str),
}
