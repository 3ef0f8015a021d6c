use crate::exp::*;
use crate::traits::shift::shift_and_clone;

// Assign
//
//

/// A substitution for a single de Bruijn index.
///
/// Substituting closes the hole left by a consumed binder: the variable at
/// `idx` is replaced and every index above it is decremented.
///
/// `exp` may be `None` when the caller knows the index cannot occur (the
/// fixpoint unfold drops the self-reference of a body that is closed), in
/// which case only the index compression happens.
#[derive(Debug, Clone)]
pub struct Assign {
    pub idx: usize,
    pub exp: Option<Exp>,
}

impl Assign {
    pub fn new(idx: usize, exp: Option<Exp>) -> Self {
        Assign { idx, exp }
    }

    /// The substitution adjusted for one more enclosing binder.
    fn under_binder(&self) -> Assign {
        Assign {
            idx: self.idx + 1,
            exp: self.exp.as_ref().map(shift_and_clone),
        }
    }
}

// Substitutable
//
//

pub trait Substitutable: Sized {
    type Target;
    fn subst(&self, by: &Assign) -> Self::Target;
}

impl Substitutable for Exp {
    type Target = Exp;

    fn subst(&self, by: &Assign) -> Exp {
        match self {
            Exp::App(e) => e.subst(by).into(),
            Exp::ExternalVar(e) => Exp::ExternalVar(e.clone()),
            Exp::Match(e) => e.subst(by).into(),
            Exp::LambdaVar(e) => e.subst(by),
            Exp::Lambda(e) => e.subst(by).into(),
            Exp::Struct(e) => e.subst(by).into(),
            Exp::Literal(e) => Exp::Literal(e.clone()),
            Exp::Recursion(e) => e.subst(by).into(),
        }
    }
}

impl Substitutable for App {
    type Target = App;

    fn subst(&self, by: &Assign) -> App {
        let App { fun, arg } = self;
        App { fun: fun.subst(by), arg: arg.subst(by) }
    }
}

impl Substitutable for LambdaVar {
    type Target = Exp;

    fn subst(&self, by: &Assign) -> Exp {
        let LambdaVar { idx } = self;
        if *idx == by.idx {
            // The callers guarantee a replacement whenever the index can
            // actually occur.
            by.exp
                .clone()
                .expect("substituted a variable that was promised not to occur")
        } else if *idx > by.idx {
            Exp::var(idx - 1)
        } else {
            Exp::var(*idx)
        }
    }
}

impl Substitutable for Lambda {
    type Target = Lambda;

    fn subst(&self, by: &Assign) -> Lambda {
        let Lambda { body } = self;
        Lambda { body: body.subst(&by.under_binder()) }
    }
}

impl Substitutable for Match {
    type Target = Match;

    fn subst(&self, by: &Assign) -> Match {
        let Match { on_exp, cases } = self;
        // Case bodies are lambda-wrapped, so the recursion adjusts the
        // substitution when it descends through those binders.
        Match {
            on_exp: on_exp.subst(by),
            cases: cases
                .iter()
                .map(|case| Case { pattern: case.pattern.clone(), body: case.body.subst(by) })
                .collect(),
        }
    }
}

impl Substitutable for Struct {
    type Target = Struct;

    fn subst(&self, by: &Assign) -> Struct {
        let Struct { tag, args, family } = self;
        Struct { tag: *tag, args: args.iter().map(|arg| arg.subst(by)).collect(), family: *family }
    }
}

impl Substitutable for Recursion {
    type Target = Recursion;

    fn subst(&self, by: &Assign) -> Recursion {
        let Recursion { inner } = self;
        Recursion { inner: inner.subst(by) }
    }
}

impl<T: Substitutable> Substitutable for Box<T> {
    type Target = Box<T::Target>;

    fn subst(&self, by: &Assign) -> Self::Target {
        Box::new((**self).subst(by))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subst_replaces_and_compresses() {
        // @0 @1 @2 with @0 := 42 becomes 42 @0 @1.
        let exp = Exp::app(Exp::app(Exp::var(0), Exp::var(1)), Exp::var(2));
        let result = exp.subst(&Assign::new(0, Some(Exp::int(42))));
        assert_eq!(result, Exp::app(Exp::app(Exp::int(42), Exp::var(0)), Exp::var(1)));
    }

    #[test]
    fn subst_shifts_the_replacement_under_binders() {
        // \. @1 with the outer @0 := @0 must shift the replacement to @1.
        let exp = Exp::lambda(Exp::var(1));
        let result = exp.subst(&Assign::new(0, Some(Exp::var(0))));
        assert_eq!(result, Exp::lambda(Exp::var(1)));
    }

    #[test]
    fn none_replacement_only_compresses() {
        let exp = Exp::app(Exp::int(1), Exp::var(3));
        let result = exp.subst(&Assign::new(0, None));
        assert_eq!(result, Exp::app(Exp::int(1), Exp::var(2)));
    }
}
