//! The grammar entry point: binding a typed expression to an input buffer
//! and getting back a value or a furthest-failure diagnostic.

use crate::expr::Expr;
use crate::hlist::IntoFlat;
use crate::state::ParserState;

/// The result of a single [`Parser::parse`] call.
///
/// On success, carries the start rule's flattened value (`()` if the
/// grammar is unit-typed). On failure, carries the furthest byte offset any
/// branch of the grammar reached before everything backtracked — the usual
/// PEG heuristic for "where the input actually went wrong", since a plain
/// "it didn't match at position 0" is rarely where the real problem is.
pub struct Outcome<T> {
    result: Result<T, usize>,
}

impl<T> Outcome<T> {
    /// Whether the parse succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The parsed value, if the parse succeeded.
    pub fn value(self) -> Option<T> {
        self.result.ok()
    }

    /// The furthest position any branch reached before failing, if the
    /// parse failed.
    pub fn furthest_failure_offset(&self) -> Option<usize> {
        self.result.as_ref().err().copied()
    }
}

/// Binds a start expression to repeated use as a complete parser.
///
/// A `Parser` borrows its start expression rather than owning it, since
/// grammars are typically built once (often as `Rule`s referencing each
/// other) and then parsed against many different inputs.
pub struct Parser<'e, E> {
    start: &'e E,
}

impl<'e, E> Parser<'e, E>
where
    E: Expr,
    E::Output: IntoFlat,
{
    /// Build a parser from a start expression.
    pub fn new(start: &'e E) -> Self {
        Parser { start }
    }

    /// Run the grammar against the whole of `input`. A match that doesn't
    /// consume every byte is still reported as matching up to where it
    /// stopped — callers that require consuming the full input should
    /// sequence the start rule with an explicit end-of-input check
    /// (`self.start.seq(not_eof_check)`, or simply compare the consumed
    /// length against `input.len()` after a successful [`Outcome`]).
    pub fn parse(&self, input: &[u8]) -> Outcome<<E::Output as IntoFlat>::Flat> {
        let mut state = ParserState::new(input);
        match self.start.eval(&mut state) {
            Some(value) => Outcome {
                result: Ok(value.into_flat()),
            },
            None => Outcome {
                result: Err(state.furthest_failure()),
            },
        }
    }
}
