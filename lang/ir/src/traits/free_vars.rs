use ast::HashSet;

use crate::exp::*;

/// Free-variable queries on de Bruijn terms.
///
/// Both queries look through binders: a variable is free if it refers past
/// every enclosing lambda of the term under inspection. Match case bodies
/// carry their own lambda wrappers for the slots their pattern binds, so the
/// traversal treats them like any other subterm.
pub trait FreeVars {
    /// Helper to accumulate free variables. `cutoff` is the number of
    /// binders passed so far; indices below it are bound.
    fn free_vars_mut(&self, cutoff: usize, fvs: &mut HashSet<usize>);

    /// Largest free de Bruijn index.
    ///
    /// `None` means no variable occurs at all. Passing under a binder
    /// decrements, so the result can be negative: the term is closed if and
    /// only if the result is `None` or negative.
    fn max_lambda_var(&self) -> Option<i64>;

    /// The set of free de Bruijn indices.
    fn var_set(&self) -> HashSet<usize> {
        let mut fvs = HashSet::default();
        self.free_vars_mut(0, &mut fvs);
        fvs
    }

    /// Whether no de Bruijn index occurs free.
    fn is_closed(&self) -> bool {
        self.max_lambda_var().is_none_or(|max| max < 0)
    }
}

impl FreeVars for Exp {
    fn free_vars_mut(&self, cutoff: usize, fvs: &mut HashSet<usize>) {
        match self {
            Exp::App(App { fun, arg }) => {
                fun.free_vars_mut(cutoff, fvs);
                arg.free_vars_mut(cutoff, fvs);
            }
            Exp::ExternalVar(_) | Exp::Literal(_) => {}
            Exp::Match(Match { on_exp, cases }) => {
                on_exp.free_vars_mut(cutoff, fvs);
                for case in cases {
                    case.body.free_vars_mut(cutoff, fvs);
                }
            }
            Exp::LambdaVar(LambdaVar { idx }) => {
                if *idx >= cutoff {
                    fvs.insert(idx - cutoff);
                }
            }
            Exp::Lambda(Lambda { body }) => body.free_vars_mut(cutoff + 1, fvs),
            Exp::Struct(Struct { args, .. }) => {
                for arg in args {
                    arg.free_vars_mut(cutoff, fvs);
                }
            }
            Exp::Recursion(Recursion { inner }) => inner.free_vars_mut(cutoff, fvs),
        }
    }

    fn max_lambda_var(&self) -> Option<i64> {
        fn max_opt(lhs: Option<i64>, rhs: Option<i64>) -> Option<i64> {
            match (lhs, rhs) {
                (Some(l), Some(r)) => Some(l.max(r)),
                (l, r) => l.or(r),
            }
        }
        match self {
            Exp::App(App { fun, arg }) => max_opt(fun.max_lambda_var(), arg.max_lambda_var()),
            Exp::ExternalVar(_) | Exp::Literal(_) => None,
            Exp::Match(Match { on_exp, cases }) => cases
                .iter()
                .map(|case| case.body.max_lambda_var())
                .fold(on_exp.max_lambda_var(), max_opt),
            Exp::LambdaVar(LambdaVar { idx }) => Some(*idx as i64),
            Exp::Lambda(Lambda { body }) => body.max_lambda_var().map(|max| max - 1),
            Exp::Struct(Struct { args, .. }) => {
                args.iter().map(|arg| arg.max_lambda_var()).fold(None, max_opt)
            }
            Exp::Recursion(Recursion { inner }) => inner.max_lambda_var(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_have_no_free_vars() {
        assert_eq!(Exp::int(1).max_lambda_var(), None);
        assert!(Exp::int(1).var_set().is_empty());
        assert!(Exp::int(1).is_closed());
    }

    #[test]
    fn a_binder_decrements() {
        // \. @0 is closed, \. @1 has @0 free.
        assert_eq!(Exp::lambda(Exp::var(0)).max_lambda_var(), Some(-1));
        assert!(Exp::lambda(Exp::var(0)).is_closed());
        assert_eq!(Exp::lambda(Exp::var(1)).max_lambda_var(), Some(0));
        assert_eq!(
            Exp::lambda(Exp::var(1)).var_set().into_iter().collect::<Vec<_>>(),
            vec![0]
        );
    }

    #[test]
    fn recursion_is_transparent() {
        // fix (\. @0) unfolds its own reference; nothing escapes.
        let fix = Exp::Recursion(Recursion { inner: Box::new(Exp::lambda(Exp::var(0))) });
        assert_eq!(fix.max_lambda_var(), Some(-1));
        assert!(fix.var_set().is_empty());
    }
}
