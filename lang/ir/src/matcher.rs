use ast::{DataFamily, HashMap, Lit};

use crate::exp::*;
use crate::pattern::{ListPart, Pattern};

// PatternMatch
//
//

/// The three-valued result of matching a value against a pattern.
///
/// The verdict is sound in both directions: `Matches` means the value
/// definitely matches, `NoMatch` means it definitely does not, and
/// `NotProvable` means the matcher cannot decide, typically because the
/// value is not a constructor or literal at its head. The rewriter refuses
/// to reduce past a `NotProvable` branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternMatch<E> {
    Matches(E),
    NoMatch,
    NotProvable,
}

/// Bindings produced by a successful match, keyed by pattern slot.
pub type Env<V> = HashMap<usize, V>;

// MatchValue
//
//

/// The capabilities the matcher needs from a value.
///
/// Matching is defined against these hooks rather than against IR terms
/// directly, so the same matcher serves the rewriter (matching IR terms) and
/// a runtime (matching evaluated values).
pub trait MatchValue: Sized + Clone {
    fn as_literal(&self) -> Option<&Lit>;

    /// Tag and fields if the value is a constructor application of `family`.
    fn as_struct(&self, family: DataFamily) -> Option<(usize, &[Self])>;

    /// The elements if the value is a fully concrete cons list.
    fn as_list(&self) -> Option<Vec<Self>>;

    /// Build a cons-list value from elements; used to bind a splice.
    fn from_list(items: &[Self]) -> Self;
}

impl MatchValue for Exp {
    fn as_literal(&self) -> Option<&Lit> {
        match self {
            Exp::Literal(Literal { lit }) => Some(lit),
            _ => None,
        }
    }

    fn as_struct(&self, _family: DataFamily) -> Option<(usize, &[Exp])> {
        // The family is advisory; on IR terms the head constructor alone
        // decides.
        match self {
            Exp::Struct(Struct { tag, args, .. }) => Some((*tag, args)),
            _ => None,
        }
    }

    fn as_list(&self) -> Option<Vec<Exp>> {
        let mut items = Vec::new();
        let mut exp = self;
        loop {
            match exp {
                Exp::Struct(Struct { tag: 0, args, .. }) if args.is_empty() => return Some(items),
                Exp::Struct(Struct { tag: 1, args, .. }) if args.len() == 2 => {
                    items.push(args[0].clone());
                    exp = &args[1];
                }
                _ => return None,
            }
        }
    }

    fn from_list(items: &[Exp]) -> Exp {
        Exp::list(items.iter().cloned())
    }
}

// match_one
//
//

/// Match a single pattern against a value, extending `env` with the bound
/// substructures on success.
pub fn match_one<V: MatchValue>(pattern: &Pattern, value: &V, env: Env<V>) -> PatternMatch<Env<V>> {
    match pattern {
        Pattern::WildCard => PatternMatch::Matches(env),
        Pattern::Literal(lit) => match value.as_literal() {
            Some(actual) if actual == lit => PatternMatch::Matches(env),
            Some(_) => PatternMatch::NoMatch,
            None => PatternMatch::NotProvable,
        },
        Pattern::Var(name) => {
            let mut env = env;
            env.insert(*name, value.clone());
            PatternMatch::Matches(env)
        }
        Pattern::Named { name, pattern } => match match_one(pattern, value, env) {
            PatternMatch::Matches(mut env) => {
                env.insert(*name, value.clone());
                PatternMatch::Matches(env)
            }
            other => other,
        },
        Pattern::Struct { tag, params, family } => match value.as_struct(*family) {
            None => PatternMatch::NotProvable,
            Some((actual, args)) => {
                if let Some(expected) = tag {
                    if actual != *expected {
                        return PatternMatch::NoMatch;
                    }
                }
                match_positional(params, args, env)
            }
        },
        Pattern::List(parts) => match_list(parts, value, env),
        Pattern::Union { head, rest } => {
            // First match wins; any undecided alternative blocks the later
            // ones, since their order is observable.
            match match_one(head, value, env.clone()) {
                PatternMatch::NoMatch => {
                    for arm in rest {
                        match match_one(arm, value, env.clone()) {
                            PatternMatch::NoMatch => continue,
                            other => return other,
                        }
                    }
                    PatternMatch::NoMatch
                }
                other => other,
            }
        }
        // String matching is decided by a later phase.
        Pattern::Str(_) => PatternMatch::NotProvable,
    }
}

/// Fold positional subpatterns over the corresponding values.
///
/// A definite mismatch anywhere rejects the whole row, even when an earlier
/// position was undecided; an undecided position otherwise downgrades the
/// final verdict while the scan keeps looking for such a mismatch.
fn match_positional<V: MatchValue>(
    patterns: &[Pattern],
    values: &[V],
    env: Env<V>,
) -> PatternMatch<Env<V>> {
    debug_assert_eq!(patterns.len(), values.len(), "constructor arity mismatch");
    let mut env = env;
    let mut provable = true;
    for (pattern, value) in patterns.iter().zip(values) {
        match match_one(pattern, value, env.clone()) {
            PatternMatch::Matches(extended) => env = extended,
            PatternMatch::NoMatch => return PatternMatch::NoMatch,
            PatternMatch::NotProvable => provable = false,
        }
    }
    if provable { PatternMatch::Matches(env) } else { PatternMatch::NotProvable }
}

fn match_list<V: MatchValue>(
    parts: &[ListPart],
    value: &V,
    env: Env<V>,
) -> PatternMatch<Env<V>> {
    match parts.split_first() {
        // [] only matches nil.
        None => match value.as_struct(DataFamily::Enum) {
            Some((0, _)) => PatternMatch::Matches(env),
            Some((1, _)) => PatternMatch::NoMatch,
            _ => PatternMatch::NotProvable,
        },
        Some((ListPart::Item(head_pat), rest)) => match value.as_struct(DataFamily::Enum) {
            Some((1, args)) if args.len() == 2 => {
                let mut env = env;
                let mut provable = true;
                match match_one(head_pat, &args[0], env.clone()) {
                    PatternMatch::Matches(extended) => env = extended,
                    PatternMatch::NoMatch => return PatternMatch::NoMatch,
                    PatternMatch::NotProvable => provable = false,
                }
                match match_list(rest, &args[1], env) {
                    PatternMatch::Matches(env) if provable => PatternMatch::Matches(env),
                    PatternMatch::Matches(_) => PatternMatch::NotProvable,
                    PatternMatch::NoMatch => PatternMatch::NoMatch,
                    PatternMatch::NotProvable => PatternMatch::NotProvable,
                }
            }
            Some((0, _)) => PatternMatch::NoMatch,
            _ => PatternMatch::NotProvable,
        },
        Some((ListPart::Splice(binding), rest)) => {
            if rest.is_empty() {
                // A trailing splice takes whatever is left.
                let mut env = env;
                if let Some(name) = binding {
                    env.insert(*name, value.clone());
                }
                PatternMatch::Matches(env)
            } else {
                // A leading splice needs the whole list to be concrete so
                // the fixed-length tail can be split off.
                let Some(items) = value.as_list() else {
                    return PatternMatch::NotProvable;
                };
                if items.len() < rest.len() {
                    return PatternMatch::NoMatch;
                }
                let (prefix, tail) = items.split_at(items.len() - rest.len());
                let mut env = env;
                let mut provable = true;
                for (part, item) in rest.iter().zip(tail) {
                    let ListPart::Item(pattern) = part else {
                        unreachable!("list pattern has a second splice");
                    };
                    match match_one(pattern, item, env.clone()) {
                        PatternMatch::Matches(extended) => env = extended,
                        PatternMatch::NoMatch => return PatternMatch::NoMatch,
                        PatternMatch::NotProvable => provable = false,
                    }
                }
                if let Some(name) = binding {
                    env.insert(*name, V::from_list(prefix));
                }
                if provable { PatternMatch::Matches(env) } else { PatternMatch::NotProvable }
            }
        }
    }
}

// find_match / solve_match
//
//

/// Find the first case of a match that provably applies.
///
/// Cases are tried in order. An undecided case stops the search with `None`:
/// a later case may only fire once every earlier one has been ruled out, so
/// nothing can be reduced until the scrutinee becomes more concrete.
pub fn find_match<'a, V: MatchValue>(
    scrutinee: &V,
    cases: &'a [Case],
) -> Option<(&'a Case, Env<V>)> {
    for case in cases {
        match match_one(&case.pattern, scrutinee, Env::default()) {
            PatternMatch::Matches(env) => return Some((case, env)),
            PatternMatch::NoMatch => continue,
            PatternMatch::NotProvable => return None,
        }
    }
    None
}

/// Apply a chosen case body to the values its pattern bound.
///
/// The body carries one lambda per slot, innermost binder for slot `0`, so
/// the arguments are applied in reverse slot order. The resulting betas are
/// performed by the ordinary reduction rules.
pub fn solve_match(env: Env<Exp>, case: &Case) -> Exp {
    let slots = case.pattern.var_count();
    let mut out = case.body.clone();
    for slot in (0..slots).rev() {
        let arg = env
            .get(&slot)
            .cloned()
            .expect("match env is missing a pattern slot");
        out = Exp::app(out, arg);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(result: PatternMatch<Env<Exp>>) -> Env<Exp> {
        match result {
            PatternMatch::Matches(env) => env,
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn literals_compare_for_equality() {
        let pat = Pattern::Literal(Lit::int(1));
        assert!(matches!(
            match_one(&pat, &Exp::int(1), Env::default()),
            PatternMatch::Matches(_)
        ));
        assert_eq!(match_one(&pat, &Exp::int(2), Env::default()), PatternMatch::NoMatch);
        assert_eq!(match_one(&pat, &Exp::var(0), Env::default()), PatternMatch::NotProvable);
    }

    #[test]
    fn splice_binds_the_rest_of_the_list() {
        let pat = Pattern::list(vec![
            ListPart::Item(Pattern::Var(0)),
            ListPart::Splice(Some(1)),
        ])
        .unwrap();
        let value = Exp::list([Exp::int(10), Exp::int(20), Exp::int(30)]);
        let env = matched(match_one(&pat, &value, Env::default()));
        assert_eq!(env[&0], Exp::int(10));
        assert_eq!(env[&1], Exp::list([Exp::int(20), Exp::int(30)]));
    }

    #[test]
    fn leading_splice_matches_an_exact_tail() {
        let pat = Pattern::list(vec![
            ListPart::Splice(Some(0)),
            ListPart::Item(Pattern::Var(1)),
        ])
        .unwrap();
        let value = Exp::list([Exp::int(1), Exp::int(2), Exp::int(3)]);
        let env = matched(match_one(&pat, &value, Env::default()));
        assert_eq!(env[&0], Exp::list([Exp::int(1), Exp::int(2)]));
        assert_eq!(env[&1], Exp::int(3));

        // Too short for the fixed tail.
        let pat = Pattern::list(vec![
            ListPart::Splice(None),
            ListPart::Item(Pattern::WildCard),
            ListPart::Item(Pattern::WildCard),
        ])
        .unwrap();
        let value = Exp::list([Exp::int(1)]);
        assert_eq!(match_one(&pat, &value, Env::default()), PatternMatch::NoMatch);
    }

    #[test]
    fn leading_splice_needs_a_concrete_list() {
        let pat = Pattern::list(vec![
            ListPart::Splice(None),
            ListPart::Item(Pattern::WildCard),
        ])
        .unwrap();
        // The tail is an opaque variable, so the length is unknown.
        let value = Exp::cons(Exp::int(1), Exp::var(0));
        assert_eq!(match_one(&pat, &value, Env::default()), PatternMatch::NotProvable);
    }

    #[test]
    fn union_takes_the_first_match() {
        let pat =
            Pattern::union(Pattern::Literal(Lit::int(1)), vec![Pattern::Literal(Lit::int(2))])
                .unwrap();
        assert!(matches!(
            match_one(&pat, &Exp::int(2), Env::default()),
            PatternMatch::Matches(_)
        ));
        assert_eq!(match_one(&pat, &Exp::int(3), Env::default()), PatternMatch::NoMatch);
        assert_eq!(match_one(&pat, &Exp::var(0), Env::default()), PatternMatch::NotProvable);
    }

    #[test]
    fn later_mismatch_beats_earlier_undecided() {
        // (_, 1) against (@0, 2): position 0 is undecided but position 1
        // definitely rejects.
        let pat = Pattern::Struct {
            tag: None,
            params: vec![Pattern::Literal(Lit::int(0)), Pattern::Literal(Lit::int(1))],
            family: DataFamily::Struct,
        };
        let value = Exp::Struct(Struct {
            tag: 0,
            args: vec![Exp::var(0), Exp::int(2)],
            family: DataFamily::Struct,
        });
        assert_eq!(match_one(&pat, &value, Env::default()), PatternMatch::NoMatch);
    }

    #[test]
    fn undecided_position_downgrades_a_would_be_match() {
        let pat = Pattern::Struct {
            tag: None,
            params: vec![Pattern::Literal(Lit::int(0)), Pattern::Literal(Lit::int(1))],
            family: DataFamily::Struct,
        };
        let value = Exp::Struct(Struct {
            tag: 0,
            args: vec![Exp::var(0), Exp::int(1)],
            family: DataFamily::Struct,
        });
        assert_eq!(match_one(&pat, &value, Env::default()), PatternMatch::NotProvable);
    }

    #[test]
    fn string_patterns_are_deferred() {
        let pat = Pattern::str(vec![crate::pattern::StrPart::LitStr("a".to_owned())]).unwrap();
        assert_eq!(match_one(&pat, &Exp::str("a"), Env::default()), PatternMatch::NotProvable);
    }

    #[test]
    fn find_match_stops_at_an_undecided_case() {
        let cases = vec![
            Case {
                pattern: Pattern::Struct { tag: Some(0), params: vec![], family: DataFamily::Enum },
                body: Exp::int(1),
            },
            Case { pattern: Pattern::WildCard, body: Exp::int(2) },
        ];
        // An opaque scrutinee decides nothing, even though the second case
        // is a wildcard.
        assert!(find_match(&Exp::var(0), &cases).is_none());
        // A concrete scrutinee picks the first case.
        let (case, _) = find_match(&Exp::nil(), &cases).unwrap();
        assert_eq!(case.body, Exp::int(1));
    }

    #[test]
    fn solve_match_applies_slots_in_reverse_order() {
        // Pattern binding two slots; body \.\. @1(@0) receives slot 0 as the
        // innermost argument.
        let case = Case {
            pattern: Pattern::Struct {
                tag: Some(1),
                params: vec![Pattern::Var(0), Pattern::Var(1)],
                family: DataFamily::Enum,
            },
            body: Exp::lambda(Exp::lambda(Exp::app(Exp::var(1), Exp::var(0)))),
        };
        let mut env = Env::default();
        env.insert(0, Exp::int(10));
        env.insert(1, Exp::int(20));
        let out = solve_match(env, &case);
        assert_eq!(
            out,
            Exp::app(Exp::app(case.body.clone(), Exp::int(20)), Exp::int(10))
        );
    }
}
