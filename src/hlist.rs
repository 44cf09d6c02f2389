//! Tuple concatenation utilities.
//!
//! Every [`crate::expr::Expr`] node's associated `Output` is, internally, a
//! heterogeneous list rather than a bare value or a native Rust tuple: `HNil`
//! stands for "this node contributes nothing" (a unit-typed expression) and
//! `HCons<Head, Tail>` stands for "one more value, then the rest".
//!
//! This indirection exists because of a coherence wrinkle, not because it is
//! the prettiest possible design. Rust has no way to write a single generic
//! impl that treats "any type" as a lone contribution while *also*
//! special-casing the unit type and genuine tuples — a blanket
//! `impl<T> Trait for T` already covers every tuple arity too, so a second,
//! tuple-specific impl is a coherence error, not a style nit. Structurally
//! recursive cons-cells sidestep the problem entirely: `HNil` and
//! `HCons<H, T>` are concrete, mutually distinct types (the same trick
//! `frunk`-style crates use), so dispatching on *which one* a type is never
//! overlaps with dispatching on *whether it's `()`*.
//!
//! None of this leaks into the public API. Sequencing, options, repetition
//! and the mapper catalogue all convert back to ordinary Rust values —
//! `()`, a bare `T`, or a plain tuple — via [`IntoFlat`] at the point where a
//! caller actually observes a result.

/// The empty heterogeneous list: the flat-tuple contribution of a unit-typed
/// expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HNil;

/// A non-empty heterogeneous list: one value (`head`) followed by the rest
/// (`tail`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HCons<Head, Tail> {
    /// The first value contributed to the flat tuple.
    pub head: Head,
    /// The remaining values, as a nested `HCons`/`HNil` chain.
    pub tail: Tail,
}

/// Splices one heterogeneous list onto the end of another.
///
/// This is what makes sequencing associative at the type level:
/// `(a.seq(b)).seq(c)` and `a.seq(b.seq(c))` both append the same three
/// contributions in the same order, because `happend` walks to the end of
/// the left-hand list and reattaches the right-hand one there regardless of
/// how the calls were grouped.
pub trait HAppend<Rhs> {
    /// The list produced by appending `Rhs` after `Self`.
    type Output;

    /// Append `rhs` after `self`.
    fn happend(self, rhs: Rhs) -> Self::Output;
}

impl<Rhs> HAppend<Rhs> for HNil {
    type Output = Rhs;

    fn happend(self, rhs: Rhs) -> Rhs {
        rhs
    }
}

impl<Head, Tail, Rhs> HAppend<Rhs> for HCons<Head, Tail>
where
    Tail: HAppend<Rhs>,
{
    type Output = HCons<Head, Tail::Output>;

    fn happend(self, rhs: Rhs) -> Self::Output {
        HCons {
            head: self.head,
            tail: self.tail.happend(rhs),
        }
    }
}

/// Converts an internal heterogeneous list into the value a caller actually
/// sees: `()` for `HNil`, a bare value for a single-element list, or an
/// ordinary Rust tuple for everything longer.
///
/// This is the unit-elision and flattening rule of §4.3 made concrete: a
/// grammar author never writes or matches on `HNil`/`HCons` directly, only
/// on `Self::Flat`.
pub trait IntoFlat {
    /// The user-facing shape: `()`, a bare value, or a tuple.
    type Flat;

    /// Discard the list structure and produce the flat value.
    fn into_flat(self) -> Self::Flat;
}

impl IntoFlat for HNil {
    type Flat = ();

    fn into_flat(self) -> () {}
}

macro_rules! into_flat_impls {
    ($($name:ident),+) => {
        impl<$($name),+> IntoFlat for into_flat_impls!(@nest $($name),+) {
            type Flat = ($($name,)+);

            fn into_flat(self) -> Self::Flat {
                into_flat_impls!(@unpack self => $($name),+)
            }
        }
    };
    (@nest $head:ident) => { HCons<$head, HNil> };
    (@nest $head:ident, $($rest:ident),+) => { HCons<$head, into_flat_impls!(@nest $($rest),+)> };
    (@unpack $self:ident => $head:ident) => {
        ($self.head,)
    };
    (@unpack $self:ident => $head:ident, $($rest:ident),+) => {
        {
            let HCons { head, tail } = $self;
            let rest = into_flat_impls!(@unpack tail => $($rest),+);
            into_flat_impls!(@prepend head, rest => $($rest),+)
        }
    };
    (@prepend $head:ident, $rest:ident => $($names:ident),+) => {
        {
            #[allow(non_snake_case)]
            let ($($names,)+) = $rest;
            ($head, $($names,)+)
        }
    };
}

// A single-element list flattens to a bare value, never a 1-tuple — the
// `(A,)` case is handled by hand above rather than by the macro, since the
// macro's uniform "wrap every arm in a tuple" shape would otherwise produce
// `(A,)` instead of `A`.
impl<A> IntoFlat for HCons<A, HNil> {
    type Flat = A;

    fn into_flat(self) -> A {
        self.head
    }
}

into_flat_impls!(A, B);
into_flat_impls!(A, B, C);
into_flat_impls!(A, B, C, D);
into_flat_impls!(A, B, C, D, E);
into_flat_impls!(A, B, C, D, E, F);
into_flat_impls!(A, B, C, D, E, F, G);

/// Wraps the flattened results of a sub-expression into the shape that
/// [`crate::combinator::Repeat`] contributes to its own enclosing sequence:
/// nothing for a unit child, or a single `Vec<Flat>` value otherwise.
///
/// Implemented for every arity `IntoFlat` supports; see that trait for why
/// dispatch is keyed on the concrete `HNil`/`HCons` shape rather than on
/// "is this `()`" in the abstract.
pub trait RepeatedOutput: IntoFlat + Sized {
    /// The list `Repeat` contributes: `HNil`, or one `Vec<Self::Flat>`.
    type Repeated;

    /// Build the contribution from the collected per-iteration values.
    fn wrap_repeated(items: Vec<Self::Flat>) -> Self::Repeated;
}

impl RepeatedOutput for HNil {
    type Repeated = HNil;

    fn wrap_repeated(_items: Vec<()>) -> HNil {
        HNil
    }
}

macro_rules! repeated_output_impls {
    ($($name:ident),+) => {
        impl<$($name),+> RepeatedOutput for into_flat_impls!(@nest $($name),+) {
            type Repeated = HCons<Vec<($($name,)+)>, HNil>;

            fn wrap_repeated(items: Vec<Self::Flat>) -> Self::Repeated {
                HCons { head: items, tail: HNil }
            }
        }
    };
}

impl<A> RepeatedOutput for HCons<A, HNil> {
    type Repeated = HCons<Vec<A>, HNil>;

    fn wrap_repeated(items: Vec<A>) -> Self::Repeated {
        HCons { head: items, tail: HNil }
    }
}

repeated_output_impls!(A, B);
repeated_output_impls!(A, B, C);
repeated_output_impls!(A, B, C, D);
repeated_output_impls!(A, B, C, D, E);
repeated_output_impls!(A, B, C, D, E, F);
repeated_output_impls!(A, B, C, D, E, F, G);

/// Wraps a sub-expression's flattened result into the shape
/// [`crate::combinator::OptionExpr`] contributes: nothing for a unit child,
/// or a single `Option<Flat>` value otherwise.
pub trait OptionalOutput: IntoFlat + Sized {
    /// The list `OptionExpr` contributes: `HNil`, or one `Option<Self::Flat>`.
    type Optional;

    /// Build the "matched" contribution from the child's flattened value.
    fn wrap_some(flat: Self::Flat) -> Self::Optional;

    /// Build the "didn't match" contribution.
    fn wrap_none() -> Self::Optional;
}

impl OptionalOutput for HNil {
    type Optional = HNil;

    fn wrap_some(_flat: ()) -> HNil {
        HNil
    }

    fn wrap_none() -> HNil {
        HNil
    }
}

macro_rules! optional_output_impls {
    ($($name:ident),+) => {
        impl<$($name),+> OptionalOutput for into_flat_impls!(@nest $($name),+) {
            type Optional = HCons<Option<($($name,)+)>, HNil>;

            fn wrap_some(flat: Self::Flat) -> Self::Optional {
                HCons { head: Some(flat), tail: HNil }
            }

            fn wrap_none() -> Self::Optional {
                HCons { head: None, tail: HNil }
            }
        }
    };
}

impl<A> OptionalOutput for HCons<A, HNil> {
    type Optional = HCons<Option<A>, HNil>;

    fn wrap_some(flat: A) -> Self::Optional {
        HCons {
            head: Some(flat),
            tail: HNil,
        }
    }

    fn wrap_none() -> Self::Optional {
        HCons {
            head: None,
            tail: HNil,
        }
    }
}

optional_output_impls!(A, B);
optional_output_impls!(A, B, C);
optional_output_impls!(A, B, C, D);
optional_output_impls!(A, B, C, D, E);
optional_output_impls!(A, B, C, D, E, F);
optional_output_impls!(A, B, C, D, E, F, G);

/// Dispatches a mapper closure's call shape (no-arg, one-arg, or splatted
/// N-ary) from the heterogeneous-list shape of its sub-expression's output.
///
/// This realizes the "three entry shapes" design note: rather than one
/// generic call convention, each arity gets its own impl, selected by the
/// concrete `Args` shape (never by inspecting `F`), so ordinary closures
/// like `|a: i64, b: i64| a + b` can be passed directly to
/// [`crate::expr::Expr::map`].
pub trait MapperFn<Args> {
    /// The mapper's return type.
    type Out;

    /// Invoke the mapper with the sub-expression's (unpacked) output.
    fn call(&self, args: Args) -> Self::Out;
}

impl<F, R> MapperFn<HNil> for F
where
    F: Fn() -> R,
{
    type Out = R;

    fn call(&self, _args: HNil) -> R {
        self()
    }
}

impl<F, A, R> MapperFn<HCons<A, HNil>> for F
where
    F: Fn(A) -> R,
{
    type Out = R;

    fn call(&self, args: HCons<A, HNil>) -> R {
        self(args.head)
    }
}

macro_rules! mapper_fn_impls {
    ($($name:ident),+) => {
        impl<Func, $($name),+, R> MapperFn<into_flat_impls!(@nest $($name),+)> for Func
        where
            Func: Fn($($name),+) -> R,
        {
            type Out = R;

            #[allow(non_snake_case)]
            fn call(&self, args: into_flat_impls!(@nest $($name),+)) -> R {
                let ($($name,)+) = args.into_flat();
                self($($name),+)
            }
        }
    };
}

mapper_fn_impls!(A, B);
mapper_fn_impls!(A, B, C);
mapper_fn_impls!(A, B, C, D);
mapper_fn_impls!(A, B, C, D, E);
mapper_fn_impls!(A, B, C, D, E, F);
mapper_fn_impls!(A, B, C, D, E, F, G);
