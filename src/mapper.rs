//! The semantic-action catalogue: turning a recognized shape into a typed
//! value.
//!
//! Each adapter here always contributes exactly one value to its enclosing
//! sequence (`HCons<U, HNil>`) — unlike the structural combinators in
//! [`crate::combinator`], there's no unit-elision question to resolve
//! generically, because attaching a mapper is precisely the grammar
//! author's way of saying "there is a value here now".

use std::any::Any as StdAny;
use std::marker::PhantomData;

use crate::expr::Expr;
use crate::hlist::{HCons, HNil, IntoFlat, MapperFn};
use crate::state::ParserState;

/// `e.map(f)`: run `e`, then call `f` with its flattened output splatted
/// across `f`'s parameters (zero, one, or many, matching the arity
/// [`MapperFn`] was implemented for).
#[derive(Debug, Clone, Copy)]
pub struct MapAdapter<E, F> {
    pub(crate) inner: E,
    pub(crate) mapper: F,
}

impl<E, F> Expr for MapAdapter<E, F>
where
    E: Expr,
    F: MapperFn<E::Output>,
{
    type Output = HCons<F::Out, HNil>;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        let value = self.inner.eval(state)?;
        Some(HCons {
            head: self.mapper.call(value),
            tail: HNil,
        })
    }
}

/// `e.construct::<T>()`: run `e`, flatten its output, and build a `T` from
/// it via `T: From<Flat>`. This is the Rust realization of "splat into T's
/// constructor" — a grammar author implements `From<(A, B)> for T` and the
/// splatting happens inside that impl's destructuring pattern.
#[derive(Debug, Clone, Copy)]
pub struct ConstructAdapter<E, T> {
    pub(crate) inner: E,
    pub(crate) _marker: PhantomData<fn() -> T>,
}

impl<E, T> Expr for ConstructAdapter<E, T>
where
    E: Expr,
    E::Output: IntoFlat,
    T: From<<E::Output as IntoFlat>::Flat>,
{
    type Output = HCons<T, HNil>;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        let value = self.inner.eval(state)?;
        Some(HCons {
            head: T::from(value.into_flat()),
            tail: HNil,
        })
    }
}

/// `e.supply(value)`: run `e` (for its recognition effect only, discarding
/// whatever it produced) and always contribute a clone of `value`.
#[derive(Debug, Clone, Copy)]
pub struct SupplyAdapter<E, T> {
    pub(crate) inner: E,
    pub(crate) value: T,
}

impl<E, T> Expr for SupplyAdapter<E, T>
where
    E: Expr,
    T: Clone,
{
    type Output = HCons<T, HNil>;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        self.inner.eval(state)?;
        Some(HCons {
            head: self.value.clone(),
            tail: HNil,
        })
    }
}

/// `e.supply_null::<T>()`: run `e` and always contribute an empty owned box
/// of `T`, i.e. `None::<Box<T>>`. Rust has no "null but still owned" `Box`,
/// so `Option<Box<T>>` stands in for an empty owned box — `None` for empty,
/// `Some` for populated (see [`ConstructAdapter`] paired with a `Box<T>`
/// target, or [`CastAdapter`]).
#[derive(Debug, Clone, Copy)]
pub struct SupplyNullAdapter<E, T> {
    pub(crate) inner: E,
    pub(crate) _marker: PhantomData<fn() -> T>,
}

impl<E, T> Expr for SupplyNullAdapter<E, T>
where
    E: Expr,
{
    type Output = HCons<Option<Box<T>>, HNil>;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        self.inner.eval(state)?;
        Some(HCons {
            head: None,
            tail: HNil,
        })
    }
}

/// `e.cast::<T>()`: run `e` (whose flattened output must be an
/// `Option<Box<dyn Any>>`) and attempt a dynamic downcast to `T` — the
/// closest Rust analogue to a dynamic "if the held value is-a `T`" cast.
/// A missing or wrong-type value fails the branch, the same as any other
/// recognition failure, rather than succeeding with an empty payload.
#[derive(Clone, Copy)]
pub struct CastAdapter<E, T> {
    pub(crate) inner: E,
    pub(crate) _marker: PhantomData<fn() -> T>,
}

impl<E, T> Expr for CastAdapter<E, T>
where
    E: Expr<Output = HCons<Option<Box<dyn StdAny>>, HNil>>,
    T: StdAny,
{
    type Output = HCons<Box<T>, HNil>;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        let value = self.inner.eval(state)?;
        let boxed = value.into_flat();
        match boxed.and_then(|b| b.downcast::<T>().ok()) {
            Some(cast) => Some(HCons {
                head: cast,
                tail: HNil,
            }),
            None => {
                state.fail();
                None
            }
        }
    }
}

/// `acc.join::<F>(delta)`: evaluate `acc` as an accumulator, then `delta`,
/// folding the two flattened values together with `fold(acc, delta)`.
#[derive(Clone, Copy)]
pub struct JoinAdapter<A, B, F> {
    pub(crate) acc: A,
    pub(crate) delta: B,
    pub(crate) fold: F,
}

impl<A, B, F> Expr for JoinAdapter<A, B, F>
where
    A: Expr,
    A::Output: IntoFlat,
    B: Expr,
    B::Output: IntoFlat,
    F: Fn(<A::Output as IntoFlat>::Flat, <B::Output as IntoFlat>::Flat) -> <A::Output as IntoFlat>::Flat,
{
    type Output = HCons<<A::Output as IntoFlat>::Flat, HNil>;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        let start = state.cursor();
        let acc = match self.acc.eval(state) {
            Some(acc) => acc.into_flat(),
            None => return None,
        };
        let delta = match self.delta.eval(state) {
            Some(delta) => delta.into_flat(),
            None => {
                state.set_cursor(start);
                return None;
            }
        };
        Some(HCons {
            head: (self.fold)(acc, delta),
            tail: HNil,
        })
    }
}

/// `acc.join_each::<F>(delta, delim, lo, hi)`: like [`JoinAdapter`], but
/// folds in `lo..=hi` repetitions of `delta` (delimited by `delim`) rather
/// than exactly one.
pub struct JoinEachAdapter<A, B, D, F> {
    pub(crate) acc: A,
    pub(crate) delta: B,
    pub(crate) delim: D,
    pub(crate) fold: F,
    pub(crate) lo: usize,
    pub(crate) hi: Option<usize>,
}

impl<A, B, D, F> Expr for JoinEachAdapter<A, B, D, F>
where
    A: Expr,
    A::Output: IntoFlat,
    B: Expr,
    B::Output: IntoFlat,
    D: Expr<Output = HNil>,
    F: Fn(<A::Output as IntoFlat>::Flat, <B::Output as IntoFlat>::Flat) -> <A::Output as IntoFlat>::Flat,
{
    type Output = HCons<<A::Output as IntoFlat>::Flat, HNil>;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        let start = state.cursor();
        let mut acc = match self.acc.eval(state) {
            Some(acc) => acc.into_flat(),
            None => return None,
        };

        let mut count = 0;
        loop {
            if let Some(hi) = self.hi {
                if count >= hi {
                    break;
                }
            }

            let before_item = state.cursor();
            if count > 0 && self.delim.eval(state).is_none() {
                state.set_cursor(before_item);
                break;
            }

            match self.delta.eval(state) {
                Some(value) => {
                    acc = (self.fold)(acc, value.into_flat());
                    count += 1;
                }
                None => {
                    state.set_cursor(before_item);
                    break;
                }
            }
        }

        if count < self.lo {
            state.fail();
            state.set_cursor(start);
            return None;
        }

        state.set_ok();
        Some(HCons { head: acc, tail: HNil })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::{char, empty, literal};

    #[test]
    fn map_applies_splatted_closure() {
        let g = MapAdapter {
            inner: crate::combinator::Capture(literal("42")),
            mapper: |bytes: Vec<u8>| String::from_utf8(bytes).unwrap().parse::<i64>().unwrap(),
        };
        let mut state = ParserState::new(b"42");
        let result = g.eval(&mut state).unwrap();
        let value: i64 = result.into_flat();
        assert_eq!(value, 42);
    }

    #[test]
    fn supply_ignores_recognized_value() {
        let g = SupplyAdapter {
            inner: char('x'),
            value: 7u8,
        };
        let mut state = ParserState::new(b"x");
        let result: u8 = g.eval(&mut state).unwrap().into_flat();
        assert_eq!(result, 7);
    }

    #[test]
    fn supply_null_is_always_none() {
        let g: SupplyNullAdapter<_, u8> = SupplyNullAdapter {
            inner: char('x'),
            _marker: PhantomData,
        };
        let mut state = ParserState::new(b"x");
        let result: Option<Box<u8>> = g.eval(&mut state).unwrap().into_flat();
        assert!(result.is_none());
    }

    #[test]
    fn join_folds_accumulator_with_one_delta() {
        let acc = MapAdapter {
            inner: crate::combinator::Capture(char('1')),
            mapper: |_bytes: Vec<u8>| 1i64,
        };
        let delta = MapAdapter {
            inner: crate::combinator::Capture(char('2')),
            mapper: |_bytes: Vec<u8>| 2i64,
        };
        let g = JoinAdapter {
            acc,
            delta,
            fold: |a: i64, b: i64| a + b,
        };
        let mut state = ParserState::new(b"12");
        let result: i64 = g.eval(&mut state).unwrap().into_flat();
        assert_eq!(result, 3);
    }

    #[test]
    fn join_each_folds_every_repetition() {
        let acc = SupplyAdapter { inner: empty(), value: 0i64 };
        let delta = MapAdapter {
            inner: crate::combinator::Capture(crate::terminal::class(
                crate::bitset::CharClass::from_descriptor("0-9").unwrap(),
            )),
            mapper: |bytes: Vec<u8>| (bytes[0] - b'0') as i64,
        };
        let g = JoinEachAdapter {
            acc,
            delta,
            delim: empty(),
            fold: |a: i64, b: i64| a + b,
            lo: 0,
            hi: None,
        };
        let mut state = ParserState::new(b"123");
        let result: i64 = g.eval(&mut state).unwrap().into_flat();
        assert_eq!(result, 6);
    }

    #[test]
    fn join_restores_cursor_when_delta_fails_after_acc_consumed_input() {
        let acc = MapAdapter {
            inner: crate::combinator::Capture(char('1')),
            mapper: |_bytes: Vec<u8>| 1i64,
        };
        let delta = MapAdapter {
            inner: crate::combinator::Capture(char('2')),
            mapper: |_bytes: Vec<u8>| 2i64,
        };
        let g = JoinAdapter {
            acc,
            delta,
            fold: |a: i64, b: i64| a + b,
        };
        let mut state = ParserState::new(b"1x");
        assert!(g.eval(&mut state).is_none());
        assert_eq!(state.cursor(), 0, "a failed join must not leave the cursor advanced");
    }

    #[test]
    fn join_each_restores_cursor_when_below_lo() {
        let acc = SupplyAdapter { inner: empty(), value: 0i64 };
        let delta = MapAdapter {
            inner: crate::combinator::Capture(crate::terminal::class(
                crate::bitset::CharClass::from_descriptor("0-9").unwrap(),
            )),
            mapper: |bytes: Vec<u8>| (bytes[0] - b'0') as i64,
        };
        let g = JoinEachAdapter {
            acc,
            delta,
            delim: empty(),
            fold: |a: i64, b: i64| a + b,
            lo: 3,
            hi: None,
        };
        let mut state = ParserState::new(b"12x");
        assert!(g.eval(&mut state).is_none());
        assert_eq!(state.cursor(), 0, "a below-lo join_each must not leave the cursor advanced");
    }
}
