use log::trace;

use printer::Print;

use crate::exp::*;
use crate::matcher::{find_match, solve_match};
use crate::result::IrError;
use crate::traits::{Assign, FreeVars, Substitutable};

// RewriteBudget
//
//

pub const DEFAULT_BUDGET: usize = 10_000;

/// Bounds the number of head-reduction steps spent on one term.
///
/// Reduction terminates on well-typed input, but the budget keeps a
/// misbehaving or adversarial term from spinning the compiler forever.
#[derive(Debug, Clone)]
pub struct RewriteBudget {
    budget: usize,
    used: usize,
}

impl RewriteBudget {
    pub fn new(budget: usize) -> Self {
        RewriteBudget { budget, used: 0 }
    }

    fn step(&mut self) -> Result<(), IrError> {
        if self.used == self.budget {
            return Err(IrError::RewriteBudgetExceeded { budget: self.budget });
        }
        self.used += 1;
        Ok(())
    }
}

impl Default for RewriteBudget {
    fn default() -> Self {
        RewriteBudget::new(DEFAULT_BUDGET)
    }
}

// Normalize
//
//

pub trait Normalize {
    type Nf;

    /// Reduce to normal form, leftmost-outermost first.
    fn normalize(&self, budget: &mut RewriteBudget) -> Result<Self::Nf, IrError>;
}

impl Normalize for Exp {
    type Nf = Exp;

    fn normalize(&self, budget: &mut RewriteBudget) -> Result<Exp, IrError> {
        let mut exp = self.clone();
        // A normalized child can re-enable a head rule (a scrutinee may
        // only now expose its constructor), so head reduction and child
        // normalization alternate until neither makes progress.
        loop {
            let head = head_reduce(exp, budget)?;
            let next = normalize_children(&head, budget)?;
            if next == head {
                return Ok(next);
            }
            exp = next;
        }
    }
}

fn normalize_children(exp: &Exp, budget: &mut RewriteBudget) -> Result<Exp, IrError> {
    let out = match exp {
        Exp::App(App { fun, arg }) => Exp::app(fun.normalize(budget)?, arg.normalize(budget)?),
        Exp::ExternalVar(_) | Exp::LambdaVar(_) | Exp::Literal(_) => exp.clone(),
        Exp::Match(Match { on_exp, cases }) => {
            let cases = cases
                .iter()
                .map(|case| {
                    Ok(Case { pattern: case.pattern.clone(), body: case.body.normalize(budget)? })
                })
                .collect::<Result<Vec<_>, IrError>>()?;
            Exp::Match(Match { on_exp: Box::new(on_exp.normalize(budget)?), cases })
        }
        Exp::Lambda(Lambda { body }) => Exp::lambda(body.normalize(budget)?),
        Exp::Struct(Struct { tag, args, family }) => {
            let args =
                args.iter().map(|arg| arg.normalize(budget)).collect::<Result<Vec<_>, _>>()?;
            Exp::Struct(Struct { tag: *tag, args, family: *family })
        }
        Exp::Recursion(Recursion { inner }) => {
            Exp::Recursion(Recursion { inner: Box::new(inner.normalize(budget)?) })
        }
    };
    Ok(out)
}

// Head reduction
//
//

/// Rewrite the head until no rule fires.
///
/// Rules are tried in a fixed order (beta, match, fixpoint unfold, eta),
/// and a successful step restarts the loop on the new head.
pub fn head_reduce(exp: Exp, budget: &mut RewriteBudget) -> Result<Exp, IrError> {
    let mut exp = exp;
    while let Some(next) = head_step(&exp) {
        budget.step()?;
        trace!("{} ▷ {}", exp.print_to_string(None), next.print_to_string(None));
        exp = next;
    }
    Ok(exp)
}

fn head_step(exp: &Exp) -> Option<Exp> {
    // Beta
    if let Exp::App(App { fun, arg }) = exp {
        if let Exp::Lambda(Lambda { body }) = &**fun {
            return Some(*body.subst(&Assign::new(0, Some((**arg).clone()))));
        }
    }
    // Match: reduce only when an applicable case is provable.
    if let Exp::Match(Match { on_exp, cases }) = exp {
        if let Some((case, env)) = find_match(&**on_exp, cases) {
            return Some(solve_match(env, case));
        }
    }
    // Fixpoint unfold: a body that ignores its self-reference sheds the
    // fixpoint entirely.
    if let Exp::Recursion(Recursion { inner }) = exp {
        if let Exp::Lambda(Lambda { body }) = &**inner {
            if body.is_closed() {
                return Some(*body.subst(&Assign::new(0, None)));
            }
        }
    }
    // Eta: \. f(@0) is f, provided f does not use the binder.
    if let Exp::Lambda(Lambda { body }) = exp {
        if let Exp::App(App { fun, arg }) = &**body {
            if matches!(&**arg, Exp::LambdaVar(LambdaVar { idx: 0 })) && fun.is_closed() {
                return Some(*fun.subst(&Assign::new(0, Some(Exp::var(0)))));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_reduce_performs_beta() {
        let exp = Exp::app(Exp::lambda(Exp::var(0)), Exp::int(42));
        let mut budget = RewriteBudget::default();
        assert_eq!(head_reduce(exp, &mut budget).unwrap(), Exp::int(42));
    }

    #[test]
    fn beta_agrees_with_substitution() {
        let body = Exp::app(Exp::var(0), Exp::var(1));
        let arg = Exp::int(7);
        let redex = Exp::app(Exp::lambda(body.clone()), arg.clone());
        let mut budget = RewriteBudget::default();
        assert_eq!(
            head_reduce(redex, &mut budget).unwrap(),
            body.subst(&Assign::new(0, Some(arg)))
        );
    }

    #[test]
    fn eta_requires_a_closed_function() {
        // \. @1(@0) must not eta-reduce: @1 refers through the binder.
        let exp = Exp::lambda(Exp::app(Exp::var(1), Exp::var(0)));
        let mut budget = RewriteBudget::default();
        assert_eq!(head_reduce(exp.clone(), &mut budget).unwrap(), exp);
    }

    #[test]
    fn budget_exhaustion_is_reported() {
        let omega = Exp::lambda(Exp::app(Exp::var(0), Exp::var(0)));
        let spin = Exp::app(Exp::lambda(Exp::app(Exp::var(0), Exp::var(0))), omega);
        let mut budget = RewriteBudget::new(16);
        let err = head_reduce(spin, &mut budget).unwrap_err();
        assert!(matches!(err, IrError::RewriteBudgetExceeded { budget: 16 }));
    }
}
