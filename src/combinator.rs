//! The structural combinators: sequencing, ordered choice, repetition,
//! optionality, lookahead and capture.
//!
//! Every type here is a concrete, hand-written struct with its own
//! `impl Expr`. None of them dispatch generically over "is my child unit or
//! not" — each one's `Output` is written down directly, because the author
//! (not a blanket impl) always knows which shape it produces. The only
//! place generic dispatch happens is splicing children's already-`HList`
//! outputs together, via [`crate::hlist::HAppend`] and friends, which is
//! legal precisely because `HNil`/`HCons` are concrete, mutually exclusive
//! types rather than "any `T`" vs. the literal unit type.

use crate::expr::Expr;
use crate::hlist::{HAppend, HNil, IntoFlat, OptionalOutput, RepeatedOutput};
use crate::state::ParserState;

/// `a.seq(b)`, written `a >> b` in the grammar notation: match `a` then `b`
/// at the resulting cursor, backtracking to the starting cursor if either
/// fails. Contributes the concatenation of both children's values.
#[derive(Debug, Clone, Copy)]
pub struct Seq<A, B>(pub(crate) A, pub(crate) B);

impl<A, B> Seq<A, B> {
    pub(crate) fn new(a: A, b: B) -> Self {
        Seq(a, b)
    }
}

impl<A, B> Expr for Seq<A, B>
where
    A: Expr,
    B: Expr,
    A::Output: HAppend<B::Output>,
{
    type Output = <A::Output as HAppend<B::Output>>::Output;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        let start = state.cursor();
        let a = match self.0.eval(state) {
            Some(a) => a,
            None => {
                state.set_cursor(start);
                return None;
            }
        };
        let b = match self.1.eval(state) {
            Some(b) => b,
            None => {
                state.set_cursor(start);
                return None;
            }
        };
        Some(a.happend(b))
    }
}

/// `a.or(b)`, written `a | b`: try `a`; if it fails, rewind and try `b`.
/// Ordered choice, not set union — `a` always gets first refusal.
#[derive(Debug, Clone, Copy)]
pub struct Choice<A, B>(pub(crate) A, pub(crate) B);

impl<A, B> Choice<A, B> {
    pub(crate) fn new(a: A, b: B) -> Self {
        Choice(a, b)
    }
}

impl<A, B> Expr for Choice<A, B>
where
    A: Expr,
    B: Expr<Output = A::Output>,
{
    type Output = A::Output;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        let start = state.cursor();
        if let Some(value) = self.0.eval(state) {
            state.set_ok();
            return Some(value);
        }
        state.set_cursor(start);
        if let Some(value) = self.1.eval(state) {
            state.set_ok();
            return Some(value);
        }
        state.set_cursor(start);
        None
    }
}

/// `e.or_not()`, written `-e`: zero or one match of `e`. Always succeeds.
#[derive(Debug, Clone, Copy)]
pub struct OptionExpr<E>(pub(crate) E);

impl<E> Expr for OptionExpr<E>
where
    E: Expr,
    E::Output: OptionalOutput,
{
    type Output = <E::Output as OptionalOutput>::Optional;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        let start = state.cursor();
        match self.0.eval(state) {
            Some(value) => {
                state.set_ok();
                Some(<E::Output as OptionalOutput>::wrap_some(value.into_flat()))
            }
            None => {
                state.set_cursor(start);
                state.set_ok();
                Some(<E::Output as OptionalOutput>::wrap_none())
            }
        }
    }
}

/// `e.repeated(lo, hi)`: match `e` (optionally separated by `delim`) at
/// least `lo` and at most `hi` (or unboundedly, if `hi` is `None`) times.
/// Greedy: it keeps matching until `e` fails or `hi` is reached, never
/// backtracking to fewer repetitions to let a later part of the grammar
/// succeed (per the ordinary PEG repetition rule).
#[derive(Debug, Clone, Copy)]
pub struct Repeat<E, D> {
    pub(crate) inner: E,
    pub(crate) delim: D,
    pub(crate) lo: usize,
    pub(crate) hi: Option<usize>,
}

impl<E, D> Expr for Repeat<E, D>
where
    E: Expr,
    E::Output: RepeatedOutput,
    D: Expr<Output = HNil>,
{
    type Output = <E::Output as RepeatedOutput>::Repeated;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        let mut items = Vec::new();
        let start = state.cursor();

        loop {
            if let Some(hi) = self.hi {
                if items.len() >= hi {
                    break;
                }
            }

            let before_item = state.cursor();
            if !items.is_empty() {
                // A delimiter must match before every repetition after the
                // first; if it doesn't, we stop (we do not backtrack past
                // an already-accepted delimiter).
                if self.delim.eval(state).is_none() {
                    state.set_cursor(before_item);
                    break;
                }
            }

            match self.inner.eval(state) {
                Some(value) => items.push(value.into_flat()),
                None => {
                    state.set_cursor(before_item);
                    break;
                }
            }
        }

        if items.len() < self.lo {
            state.fail();
            state.set_cursor(start);
            return None;
        }

        state.set_ok();
        Some(<E::Output as RepeatedOutput>::wrap_repeated(items))
    }
}

/// `!e`: negative lookahead. Succeeds, consuming nothing, iff `e` fails at
/// the current position.
#[derive(Debug, Clone, Copy)]
pub struct NotExpr<E>(pub(crate) E);

impl<E> Expr for NotExpr<E>
where
    E: Expr<Output = HNil>,
{
    type Output = HNil;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        let start = state.cursor();
        let matched = self.0.eval(state).is_some();
        state.set_cursor(start);
        if matched {
            state.fail();
            None
        } else {
            state.set_ok();
            Some(HNil)
        }
    }
}

/// `~e`: positive lookahead, i.e. `!!e`. Succeeds, consuming nothing, iff
/// `e` matches at the current position.
#[derive(Debug, Clone, Copy)]
pub struct PositiveExpr<E>(pub(crate) E);

impl<E> Expr for PositiveExpr<E>
where
    E: Expr<Output = HNil>,
{
    type Output = HNil;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        let start = state.cursor();
        let matched = self.0.eval(state).is_some();
        state.set_cursor(start);
        if matched {
            state.set_ok();
            Some(HNil)
        } else {
            state.fail();
            None
        }
    }
}

/// `text[e]`: match `e` (which must itself be unit-typed — capture wraps a
/// recognizer, it is not itself nestable inside another capture's
/// contribution) and contribute the bytes it consumed.
///
/// The contributed value is an owned `Vec<u8>` rather than a borrowed slice
/// of the input: grammars, including the rules a capture lives inside, are
/// built once and reused across many parses (§3's "constructed once at
/// grammar-definition time" lifecycle), so no single lifetime can be baked
/// into a capture's `Output` type without threading a per-parse lifetime
/// parameter through every `Expr` impl in the crate (as chumsky's later
/// zero-copy rewrite does). One allocation per capture is the trade for
/// keeping the non-terminal registry's `Rc`-based machinery simple.
#[derive(Debug, Clone, Copy)]
pub struct Capture<E>(pub(crate) E);

impl<E> Expr for Capture<E>
where
    E: Expr<Output = HNil>,
{
    type Output = crate::hlist::HCons<Vec<u8>, HNil>;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        let start = state.cursor();
        self.0.eval(state)?;
        let end = state.cursor();
        let bytes = state.slice(start, end).to_vec();
        Some(crate::hlist::HCons {
            head: bytes,
            tail: HNil,
        })
    }
}

pub(crate) fn seq<A, B>(a: A, b: B) -> Seq<A, B> {
    Seq::new(a, b)
}

pub(crate) fn choice<A, B>(a: A, b: B) -> Choice<A, B> {
    Choice::new(a, b)
}
