//! Non-terminals: named, possibly mutually-recursive grammar rules.
//!
//! A PEG combinator tree is an ordinary recursive Rust value, which makes
//! direct recursion impossible to write down (`let e = ... e ...;` doesn't
//! typecheck — the value would need infinite size). [`Rule`] breaks the
//! cycle the way a `recursive()` combinator usually does: declare the rule
//! first (getting a handle with a fixed, named `Output` type), build its
//! pattern using that handle wherever it needs to refer to itself or a rule
//! defined later, then tie the knot with [`define_rule`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::RuleError;
use crate::expr::Expr;
use crate::state::ParserState;

trait ErasedExpr<T> {
    fn eval_erased(&self, state: &mut ParserState<'_>) -> Option<T>;
}

impl<E> ErasedExpr<E::Output> for E
where
    E: Expr,
{
    fn eval_erased(&self, state: &mut ParserState<'_>) -> Option<E::Output> {
        self.eval(state)
    }
}

/// A handle to a named, typed grammar rule.
///
/// Cloning a `Rule` is cheap (it's an `Rc` underneath) and gives another
/// handle to the *same* rule, which is how mutual recursion is wired up:
/// clone the handle into a closure or struct built before the rule's own
/// pattern is defined.
pub struct Rule<T> {
    name: &'static str,
    pattern: Rc<RefCell<Option<Rc<dyn ErasedExpr<T>>>>>,
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        Rule {
            name: self.name,
            pattern: self.pattern.clone(),
        }
    }
}

impl<T> Rule<T> {
    /// The rule's name, as given to [`declare_rule`]. Used only for
    /// diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// A reference to this rule usable as an ordinary [`Expr`] wherever the
    /// grammar needs to invoke it — this is the `nterm<R>` construct.
    pub fn as_expr(&self) -> NTermRef<T> {
        NTermRef {
            name: self.name,
            pattern: self.pattern.clone(),
        }
    }
}

/// Declare a rule named `name` with result type `T`, without yet providing
/// its pattern. Use [`define_rule`] to supply the pattern, possibly after
/// building other rules that refer back to this one via
/// [`Rule::as_expr`].
pub fn declare_rule<T>(name: &'static str) -> Rule<T> {
    Rule {
        name,
        pattern: Rc::new(RefCell::new(None)),
    }
}

/// Supply `rule`'s pattern. Fails with [`RuleError::AlreadyDefined`] if the
/// rule already has one.
pub fn define_rule<T, E>(rule: &Rule<T>, pattern: E) -> Result<(), RuleError>
where
    E: Expr<Output = T> + 'static,
{
    let mut slot = rule.pattern.borrow_mut();
    if slot.is_some() {
        return Err(RuleError::AlreadyDefined(rule.name));
    }
    *slot = Some(Rc::new(pattern));
    Ok(())
}

/// An invocation of a [`Rule`] from within another expression — the
/// `nterm<R>` construct. Evaluating it defers to whatever pattern the rule
/// was last given via [`define_rule`].
#[derive(Clone)]
pub struct NTermRef<T> {
    name: &'static str,
    pattern: Rc<RefCell<Option<Rc<dyn ErasedExpr<T>>>>>,
}

impl<T> Expr for NTermRef<T> {
    type Output = T;

    fn eval(&self, state: &mut ParserState<'_>) -> Option<Self::Output> {
        let pattern = self
            .pattern
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("rule '{}' was referenced but never defined", self.name));
        pattern.eval_erased(state)
    }
}

/// Construct an [`NTermRef`] for `rule` — shorthand for `rule.as_expr()`.
pub fn nterm<T>(rule: &Rule<T>) -> NTermRef<T> {
    rule.as_expr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::Choice;
    use crate::hlist::HNil;
    use crate::terminal::char;

    #[test]
    fn self_referential_rule_matches_nested_parens() {
        // balanced := '(' balanced ')' | 'x'
        let balanced: Rule<HNil> = declare_rule("balanced");
        let nested = crate::combinator::Seq(
            char('('),
            crate::combinator::Seq(nterm(&balanced), char(')')),
        );
        define_rule(&balanced, Choice(nested, char('x'))).unwrap();

        let mut state = ParserState::new(b"((x))");
        assert!(nterm(&balanced).eval(&mut state).is_some());
        assert_eq!(state.cursor(), 5);

        let mut state = ParserState::new(b"((x)");
        assert!(nterm(&balanced).eval(&mut state).is_none());
    }

    #[test]
    fn simple_rule_matches() {
        let leaf: Rule<HNil> = declare_rule("leaf");
        define_rule(&leaf, char('x')).unwrap();
        let mut state = ParserState::new(b"x");
        assert!(nterm(&leaf).eval(&mut state).is_some());
    }

    #[test]
    fn defining_twice_is_an_error() {
        let r: Rule<HNil> = declare_rule("r");
        define_rule(&r, char('a')).unwrap();
        let err = define_rule(&r, char('b')).unwrap_err();
        assert_eq!(err, RuleError::AlreadyDefined("r"));
    }

    #[test]
    #[should_panic(expected = "was referenced but never defined")]
    fn referencing_an_undefined_rule_panics_at_first_use() {
        let r: Rule<HNil> = declare_rule("never_defined");
        let mut state = ParserState::new(b"");
        nterm(&r).eval(&mut state);
    }
}
