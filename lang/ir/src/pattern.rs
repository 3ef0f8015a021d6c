use ast::{DataFamily, Lit};
use derivative::Derivative;

use crate::result::InvalidPattern;

// Pattern
//
//

/// A pattern over IR terms.
///
/// Binding sites carry dense slot indices instead of names: the backend maps
/// every name bound by a surface pattern to its first-occurrence position,
/// so a pattern binding `n` variables uses exactly the slots `0..n`.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub enum Pattern {
    WildCard,
    Literal(Lit),
    /// Binds the matched value to a slot.
    Var(usize),
    /// Binds the whole matched value to a slot while also matching the inner
    /// pattern.
    Named { name: usize, pattern: Box<Pattern> },
    /// Matches a cons list. Use [`Pattern::list`] to construct: at most one
    /// part may be a splice.
    List(Vec<ListPart>),
    /// Matches a constructor application positionally. A `tag` of `None`
    /// accepts any constructor of the family, which is only meaningful for
    /// single-constructor data types.
    Struct {
        tag: Option<usize>,
        params: Vec<Pattern>,
        /// Advisory, like [`crate::Struct::family`].
        #[derivative(PartialEq = "ignore", Hash = "ignore")]
        family: DataFamily,
    },
    /// An or-pattern, tried left to right. Use [`Pattern::union`] to
    /// construct; nested unions are flattened. All alternatives bind the
    /// same slots, so slot accounting consults only the head.
    Union { head: Box<Pattern>, rest: Vec<Pattern> },
    /// Matches a string against a concatenation of parts. Deciding string
    /// patterns is deferred to a later phase; the core matcher reports them
    /// as not provable.
    Str(Vec<StrPart>),
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub enum ListPart {
    /// Matches any run of elements, optionally binding it as a list.
    Splice(Option<usize>),
    Item(Pattern),
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub enum StrPart {
    WildStr,
    NamedStr(usize),
    LitStr(String),
}

impl Pattern {
    /// Build a list pattern, rejecting more than one splice.
    pub fn list(parts: Vec<ListPart>) -> Result<Pattern, InvalidPattern> {
        let splices = parts.iter().filter(|part| matches!(part, ListPart::Splice(_))).count();
        if splices > 1 {
            return Err(InvalidPattern::MultipleSplices);
        }
        Ok(Pattern::List(parts))
    }

    /// Build a union pattern with at least two alternatives, flattening any
    /// nested unions.
    pub fn union(head: Pattern, rest: Vec<Pattern>) -> Result<Pattern, InvalidPattern> {
        if rest.is_empty() {
            return Err(InvalidPattern::EmptyUnion);
        }
        let mut arms = Vec::new();
        for pat in std::iter::once(head).chain(rest) {
            match pat {
                Pattern::Union { head, rest } => {
                    arms.push(*head);
                    arms.extend(rest);
                }
                other => arms.push(other),
            }
        }
        let head = arms.remove(0);
        Ok(Pattern::Union { head: Box::new(head), rest: arms })
    }

    /// Build a string pattern with at least one part.
    pub fn str(parts: Vec<StrPart>) -> Result<Pattern, InvalidPattern> {
        if parts.is_empty() {
            return Err(InvalidPattern::EmptyStrPat);
        }
        Ok(Pattern::Str(parts))
    }

    /// Number of variable slots this pattern binds.
    ///
    /// Slots are dense, so the count is one more than the largest slot index
    /// occurring in the pattern.
    pub fn var_count(&self) -> usize {
        match self {
            Pattern::WildCard | Pattern::Literal(_) => 0,
            Pattern::Var(name) => name + 1,
            Pattern::Named { name, pattern } => (name + 1).max(pattern.var_count()),
            Pattern::List(parts) => parts
                .iter()
                .map(|part| match part {
                    ListPart::Splice(Some(name)) => name + 1,
                    ListPart::Splice(None) => 0,
                    ListPart::Item(pattern) => pattern.var_count(),
                })
                .max()
                .unwrap_or(0),
            Pattern::Struct { params, .. } => {
                params.iter().map(Pattern::var_count).max().unwrap_or(0)
            }
            Pattern::Union { head, .. } => head.var_count(),
            Pattern::Str(parts) => parts
                .iter()
                .map(|part| match part {
                    StrPart::NamedStr(name) => name + 1,
                    _ => 0,
                })
                .max()
                .unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_splices_are_rejected() {
        let result = Pattern::list(vec![
            ListPart::Splice(None),
            ListPart::Item(Pattern::WildCard),
            ListPart::Splice(Some(0)),
        ]);
        assert_eq!(result, Err(InvalidPattern::MultipleSplices));
    }

    #[test]
    fn one_splice_is_accepted() {
        let result = Pattern::list(vec![
            ListPart::Item(Pattern::Var(0)),
            ListPart::Splice(Some(1)),
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn nested_unions_are_flattened() {
        let inner = Pattern::union(Pattern::Var(0), vec![Pattern::WildCard]).unwrap();
        let outer = Pattern::union(inner, vec![Pattern::Literal(Lit::int(1))]).unwrap();
        let Pattern::Union { head, rest } = outer else { panic!("expected a union") };
        assert_eq!(*head, Pattern::Var(0));
        assert_eq!(rest, vec![Pattern::WildCard, Pattern::Literal(Lit::int(1))]);
    }

    #[test]
    fn empty_union_is_rejected() {
        assert_eq!(Pattern::union(Pattern::WildCard, vec![]), Err(InvalidPattern::EmptyUnion));
    }

    #[test]
    fn var_count_is_one_past_the_largest_slot() {
        let pat = Pattern::Named {
            name: 2,
            pattern: Box::new(Pattern::Struct {
                tag: Some(1),
                params: vec![Pattern::Var(0), Pattern::Var(1)],
                family: DataFamily::Enum,
            }),
        };
        assert_eq!(pat.var_count(), 3);
        assert_eq!(Pattern::WildCard.var_count(), 0);
    }
}
