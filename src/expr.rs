//! The core trait every grammar node implements.
//!
//! `Expr` plays the same role here that chumsky's own `Parser` trait plays:
//! a single trait, implemented by one small concrete struct per primitive,
//! with builder methods that wrap `self` in the next layer (`then` → `Seq`,
//! `or` → `Choice`, `repeated` → `Repeated`, and so on).
//! The difference is `Output`: instead of a recognizer's ordinary result
//! type, it is always a [`crate::hlist`] shape, so that `seq`'s associated
//! type can be computed generically regardless of how many values each side
//! already carries.

use std::any::Any as StdAny;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::combinator::{self, Capture, Choice, NotExpr, OptionExpr, PositiveExpr, Repeat, Seq};
use crate::hlist::{HCons, HNil, IntoFlat, MapperFn, OptionalOutput, RepeatedOutput};
use crate::mapper::{
    CastAdapter, ConstructAdapter, JoinAdapter, JoinEachAdapter, MapAdapter, SupplyAdapter,
    SupplyNullAdapter,
};
use crate::state::ParserState;

/// A grammar node: both a recognizer (does this input match?) and, via
/// `Output`, a typed value constructor for what it matched.
///
/// `Output` is always an `HNil`/`HCons` shape, never a bare value or Rust
/// tuple directly — see the [`crate::hlist`] module docs for why.
pub trait Expr: Sized {
    /// This node's contribution to its enclosing sequence, as a
    /// heterogeneous list.
    type Output;

    /// Attempt to match at the current cursor. On success, advances the
    /// cursor past what was consumed and returns the matched value(s). On
    /// failure, the cursor is left exactly where the caller found it
    /// (backtracking is the caller's responsibility for anything it
    /// composed on top, but every combinator in this crate restores its own
    /// starting cursor before returning `None`).
    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output>;

    /// Run this parser over `input` from the start, without involving the
    /// rest of [`crate::parser::Parser`]'s bookkeeping. Mostly useful for
    /// tests; grammar authors normally go through [`crate::parser::Parser`].
    fn parse_from_start(&self, input: &[u8]) -> Option<Self::Output> {
        let mut state = ParserState::new(input);
        self.eval(&mut state)
    }

    /// `self >> other`: match `self` then `other`. See [`Seq`].
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let g = literal("foo").captured().seq(literal("bar").captured());
    /// let parser = Parser::new(&g);
    /// assert_eq!(
    ///     parser.parse(b"foobar").value(),
    ///     Some((b"foo".to_vec(), b"bar".to_vec()))
    /// );
    /// ```
    fn seq<B: Expr>(self, other: B) -> Seq<Self, B>
    where
        Self::Output: crate::hlist::HAppend<B::Output>,
    {
        combinator::seq(self, other)
    }

    /// `self | other`: ordered choice. See [`Choice`].
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let g = literal("cat").or(literal("dog"));
    /// assert!(g.parse_from_start(b"dog").is_some());
    /// assert!(g.parse_from_start(b"fox").is_none());
    /// ```
    fn or<B: Expr<Output = Self::Output>>(self, other: B) -> Choice<Self, B> {
        combinator::choice(self, other)
    }

    /// `-self`: zero or one match. See [`OptionExpr`].
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let g = literal("maybe").captured().or_not();
    /// let parser = Parser::new(&g);
    /// assert_eq!(parser.parse(b"maybe").value(), Some(Some(b"maybe".to_vec())));
    /// assert_eq!(parser.parse(b"nope").value(), Some(None));
    /// ```
    fn or_not(self) -> OptionExpr<Self>
    where
        Self::Output: OptionalOutput,
    {
        OptionExpr(self)
    }

    /// `self{0,}`: zero or more matches, with no separator between them.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let g = char('a').captured().many();
    /// let parser = Parser::new(&g);
    /// assert_eq!(parser.parse(b"aaa").value().unwrap().len(), 3);
    /// assert_eq!(parser.parse(b"").value().unwrap().len(), 0);
    /// ```
    fn many(self) -> Repeat<Self, crate::terminal::Empty>
    where
        Self::Output: RepeatedOutput,
    {
        Repeat {
            inner: self,
            delim: crate::terminal::empty(),
            lo: 0,
            hi: None,
        }
    }

    /// `self{1,}`: one or more matches, with no separator between them.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let g = char('a').captured().at_least_one();
    /// assert!(g.parse_from_start(b"a").is_some());
    /// assert!(g.parse_from_start(b"").is_none());
    /// ```
    fn at_least_one(self) -> Repeat<Self, crate::terminal::Empty>
    where
        Self::Output: RepeatedOutput,
    {
        Repeat {
            inner: self,
            delim: crate::terminal::empty(),
            lo: 1,
            hi: None,
        }
    }

    /// `self{lo,hi}`: between `lo` and `hi` (inclusive; unbounded if
    /// `None`) matches, with no separator between them.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let g = char('a').repeated(2, Some(3));
    /// assert!(g.parse_from_start(b"a").is_none());
    /// assert!(g.parse_from_start(b"aa").is_some());
    /// assert!(g.parse_from_start(b"aaaa").is_some());
    /// ```
    fn repeated(self, lo: usize, hi: Option<usize>) -> Repeat<Self, crate::terminal::Empty>
    where
        Self::Output: RepeatedOutput,
    {
        Repeat {
            inner: self,
            delim: crate::terminal::empty(),
            lo,
            hi,
        }
    }

    /// Like [`Expr::repeated`], but each match after the first must be
    /// preceded by a successful match of `delim`. Matches chumsky's own
    /// `separated_by` naming.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let g = char('a').captured().separated_by(char(','), 1, None);
    /// let parser = Parser::new(&g);
    /// assert_eq!(parser.parse(b"a,a,a").value().unwrap().len(), 3);
    /// assert!(parser.parse(b"").value().is_none());
    /// ```
    fn separated_by<D: Expr<Output = HNil>>(
        self,
        delim: D,
        lo: usize,
        hi: Option<usize>,
    ) -> Repeat<Self, D>
    where
        Self::Output: RepeatedOutput,
    {
        Repeat {
            inner: self,
            delim,
            lo,
            hi,
        }
    }

    /// `!self`: negative lookahead. See [`NotExpr`].
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let g = literal("end").negative_lookahead().seq(any());
    /// assert!(g.parse_from_start(b"x").is_some());
    /// assert!(g.parse_from_start(b"end").is_none());
    /// ```
    fn negative_lookahead(self) -> NotExpr<Self>
    where
        Self: Expr<Output = HNil>,
    {
        NotExpr(self)
    }

    /// `~self`, i.e. `!!self`: positive lookahead. See [`PositiveExpr`].
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let g = literal("a").lookahead().seq(any());
    /// assert!(g.parse_from_start(b"a").is_some());
    /// assert!(g.parse_from_start(b"b").is_none());
    /// ```
    fn lookahead(self) -> PositiveExpr<Self>
    where
        Self: Expr<Output = HNil>,
    {
        PositiveExpr(self)
    }

    /// `text[self]`: contribute the bytes `self` consumed rather than
    /// whatever (unit) value it produced. See [`Capture`].
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let g = literal("hi").captured();
    /// let parser = Parser::new(&g);
    /// assert_eq!(parser.parse(b"hi").value(), Some(b"hi".to_vec()));
    /// ```
    fn captured(self) -> Capture<Self>
    where
        Self: Expr<Output = HNil>,
    {
        Capture(self)
    }

    /// `self >> map<F>`: transform this node's flattened output with `f`,
    /// splatted across `f`'s parameters. See [`MapAdapter`].
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let g = literal("42")
    ///     .captured()
    ///     .map(|bytes: Vec<u8>| String::from_utf8(bytes).unwrap().parse::<i64>().unwrap());
    /// let parser = Parser::new(&g);
    /// assert_eq!(parser.parse(b"42").value(), Some(42));
    /// ```
    fn map<F>(self, f: F) -> MapAdapter<Self, F>
    where
        F: MapperFn<Self::Output>,
    {
        MapAdapter {
            inner: self,
            mapper: f,
        }
    }

    /// `self >> construct<T>`: build a `T` from this node's flattened
    /// output via `T: From<Flat>`. See [`ConstructAdapter`].
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Count(i64);
    ///
    /// impl From<i64> for Count {
    ///     fn from(n: i64) -> Self {
    ///         Count(n)
    ///     }
    /// }
    ///
    /// let g = literal("7")
    ///     .captured()
    ///     .map(|bytes: Vec<u8>| String::from_utf8(bytes).unwrap().parse::<i64>().unwrap())
    ///     .construct::<Count>();
    /// let parser = Parser::new(&g);
    /// assert_eq!(parser.parse(b"7").value(), Some(Count(7)));
    /// ```
    fn construct<T>(self) -> ConstructAdapter<Self, T>
    where
        Self::Output: IntoFlat,
        T: From<<Self::Output as IntoFlat>::Flat>,
    {
        ConstructAdapter {
            inner: self,
            _marker: PhantomData,
        }
    }

    /// `self >> construct<Box<T>>`: like [`Expr::construct`], but boxes the
    /// result — the Rust realization of "construct a pointer-to-`T`".
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Count(i64);
    ///
    /// impl From<i64> for Count {
    ///     fn from(n: i64) -> Self {
    ///         Count(n)
    ///     }
    /// }
    ///
    /// let g = literal("7")
    ///     .captured()
    ///     .map(|bytes: Vec<u8>| String::from_utf8(bytes).unwrap().parse::<i64>().unwrap())
    ///     .construct_boxed::<Count>();
    /// let parser = Parser::new(&g);
    /// assert_eq!(parser.parse(b"7").value(), Some(Box::new(Count(7))));
    /// ```
    fn construct_boxed<T>(self) -> MapAdapter<ConstructAdapter<Self, T>, fn(T) -> Box<T>>
    where
        Self::Output: IntoFlat,
        T: From<<Self::Output as IntoFlat>::Flat>,
    {
        self.construct::<T>().map(Box::new as fn(T) -> Box<T>)
    }

    /// `self >> supply(value)`: discard this node's output and always
    /// contribute a clone of `value`. See [`SupplyAdapter`].
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let g = literal("true").supply(true);
    /// let parser = Parser::new(&g);
    /// assert_eq!(parser.parse(b"true").value(), Some(true));
    /// ```
    fn supply<T: Clone>(self, value: T) -> SupplyAdapter<Self, T> {
        SupplyAdapter { inner: self, value }
    }

    /// `self >> supply_null<T>`: discard this node's output and always
    /// contribute an empty owned box of `T`. See [`SupplyNullAdapter`].
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let g = literal("null").supply_null::<i64>();
    /// let parser = Parser::new(&g);
    /// let value: Option<Option<Box<i64>>> = parser.parse(b"null").value();
    /// assert_eq!(value, Some(None));
    /// ```
    fn supply_null<T>(self) -> SupplyNullAdapter<Self, T> {
        SupplyNullAdapter {
            inner: self,
            _marker: PhantomData,
        }
    }

    /// `self >> cast<T>`: attempt a dynamic downcast of this node's boxed
    /// `dyn Any` output to `T`. See [`CastAdapter`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use typed_peg::prelude::*;
    ///
    /// let g = literal("x")
    ///     .map(|| Some(Box::new(5i64) as Box<dyn Any>))
    ///     .cast::<i64>();
    /// let parser = Parser::new(&g);
    /// let value: Option<Box<i64>> = parser.parse(b"x").value();
    /// assert_eq!(value, Some(Box::new(5i64)));
    ///
    /// // Wrong type: the cast fails the whole branch instead of succeeding
    /// // with an empty payload.
    /// let wrong = literal("x")
    ///     .map(|| Some(Box::new(5i64) as Box<dyn Any>))
    ///     .cast::<String>();
    /// assert!(!Parser::new(&wrong).parse(b"x").is_success());
    /// ```
    fn cast<T>(self) -> CastAdapter<Self, T>
    where
        Self: Expr<Output = HCons<Option<Box<dyn StdAny>>, HNil>>,
        T: StdAny,
    {
        CastAdapter {
            inner: self,
            _marker: PhantomData,
        }
    }

    /// `self.join::<F>(delta)`: treat `self` as an accumulator and fold in
    /// one match of `delta` via `fold`. See [`JoinAdapter`].
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let one = char('1').supply(1i64);
    /// let two = char('2').supply(2i64);
    /// let g = one.join(two, |a, b| a + b);
    /// let parser = Parser::new(&g);
    /// assert_eq!(parser.parse(b"12").value(), Some(3));
    /// ```
    fn join<B, F>(self, delta: B, fold: F) -> JoinAdapter<Self, B, F>
    where
        Self::Output: IntoFlat,
        B: Expr,
        B::Output: IntoFlat,
        F: Fn(
            <Self::Output as IntoFlat>::Flat,
            <B::Output as IntoFlat>::Flat,
        ) -> <Self::Output as IntoFlat>::Flat,
    {
        JoinAdapter {
            acc: self,
            delta,
            fold,
        }
    }

    /// `self.join_each::<F>(delta, delim, lo, hi)`: like [`Expr::join`], but
    /// folds in `lo..=hi` repetitions of `delta`, delimited by `delim`.
    /// See [`JoinEachAdapter`].
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let start = empty().supply(0i64);
    /// let digit = class(CharClass::from_descriptor("0-9").unwrap())
    ///     .captured()
    ///     .map(|bytes: Vec<u8>| (bytes[0] - b'0') as i64);
    /// let g = start.join_each(digit, empty(), 1, None, |a, b| a + b);
    /// let parser = Parser::new(&g);
    /// assert_eq!(parser.parse(b"123").value(), Some(6));
    /// ```
    fn join_each<B, D, F>(
        self,
        delta: B,
        delim: D,
        lo: usize,
        hi: Option<usize>,
        fold: F,
    ) -> JoinEachAdapter<Self, B, D, F>
    where
        Self::Output: IntoFlat,
        B: Expr,
        B::Output: IntoFlat,
        D: Expr<Output = HNil>,
        F: Fn(
            <Self::Output as IntoFlat>::Flat,
            <B::Output as IntoFlat>::Flat,
        ) -> <Self::Output as IntoFlat>::Flat,
    {
        JoinEachAdapter {
            acc: self,
            delta,
            delim,
            fold,
            lo,
            hi,
        }
    }

    /// Erase this node's concrete type behind an `Rc`, for grammars whose
    /// shape would otherwise need to be spelled out as an unnameable nested
    /// generic. `Rc`-backed because grammar values are shared, not
    /// exclusively owned, once a rule can reference them from multiple call
    /// sites.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_peg::prelude::*;
    ///
    /// let g = literal("a").or(literal("b")).boxed();
    /// assert!(g.parse_from_start(b"b").is_some());
    /// ```
    fn boxed(self) -> BoxedExpr<Self::Output>
    where
        Self: 'static,
    {
        BoxedExpr(Rc::new(self))
    }
}

/// A type-erased [`Expr`], for breaking up grammar definitions that would
/// otherwise be an unwieldy nested generic.
pub struct BoxedExpr<T>(Rc<dyn Expr<Output = T>>);

impl<T> Clone for BoxedExpr<T> {
    fn clone(&self) -> Self {
        BoxedExpr(self.0.clone())
    }
}

impl<T> Expr for BoxedExpr<T> {
    type Output = T;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        self.0.eval(state)
    }
}
