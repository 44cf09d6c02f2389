#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

//! Crate layout, bottom to top:
//!
//! - [`hlist`] — the heterogeneous-list plumbing every `Output` type is
//!   built from.
//! - [`state`] — the cursor/furthest-failure state threaded through a
//!   single parse.
//! - [`error`] — grammar-construction-time errors (`thiserror`-derived).
//! - [`bitset`] — the ASCII character-class bitmap and its descriptor
//!   language.
//! - [`expr`] — the [`expr::Expr`] trait every grammar node implements.
//! - [`terminal`] — the leaf recognizers (`any`, `char`, `literal`,
//!   `class`, `any_utf8`).
//! - [`combinator`] — structural combinators (`Seq`, `Choice`, `Repeat`,
//!   `OptionExpr`, lookahead, `Capture`).
//! - [`mapper`] — the semantic-action catalogue (`map`, `construct`,
//!   `supply`, `cast`, `join`).
//! - [`rule`] — named, possibly mutually-recursive non-terminals.
//! - [`utf8`] — the UTF-8 decode table backing the `any_utf8` terminal.
//! - [`parser`] — binding a grammar to an input buffer and getting a typed
//!   result or a furthest-failure diagnostic.

/// The ASCII character-class bitmap and its descriptor language.
pub mod bitset;
/// Structural combinators: `Seq`, `Choice`, `Repeat`, `OptionExpr`,
/// lookahead, `Capture`.
pub mod combinator;
/// Grammar-construction-time errors (`thiserror`-derived).
pub mod error;
/// The [`expr::Expr`] trait every grammar node implements.
pub mod expr;
/// The heterogeneous-list plumbing every `Output` type is built from.
pub mod hlist;
/// The semantic-action catalogue: `map`, `construct`, `supply`, `cast`,
/// `join`.
pub mod mapper;
/// Binding a grammar to an input buffer and getting a typed result or a
/// furthest-failure diagnostic.
pub mod parser;
/// Named, possibly mutually-recursive non-terminals.
pub mod rule;
/// The cursor/furthest-failure state threaded through a single parse.
pub mod state;
/// The leaf recognizers: `any`, `char`, `literal`, `class`, `any_utf8`.
pub mod terminal;

#[cfg(feature = "utf8")]
mod utf8;

/// Everything most grammar definitions need, in one `use`.
pub mod prelude {
    pub use crate::bitset::CharClass;
    pub use crate::error::{CharClassError, RuleError};
    pub use crate::expr::Expr;
    pub use crate::parser::{Outcome, Parser};
    pub use crate::rule::{declare_rule, define_rule, nterm, Rule};
    pub use crate::terminal::{any, char, class, empty, literal};

    #[cfg(feature = "utf8")]
    pub use crate::terminal::any_utf8;
}
