use ast::{DataFamily, Ident, Lit, PackageName, TypeRef};
use derivative::Derivative;

use crate::pattern::Pattern;

// Exp
//
//

/// A let-free expression in the untyped lambda calculus with de Bruijn
/// indices.
///
/// Lets have been eliminated by the backend: non-recursive bindings are
/// inlined and recursive bindings are represented with [`Recursion`].
/// Multi-argument functions are curried.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub enum Exp {
    App(App),
    ExternalVar(ExternalVar),
    Match(Match),
    LambdaVar(LambdaVar),
    Lambda(Lambda),
    Struct(Struct),
    Literal(Literal),
    Recursion(Recursion),
}

impl Exp {
    pub fn var(idx: usize) -> Exp {
        Exp::LambdaVar(LambdaVar { idx })
    }

    pub fn lambda(body: Exp) -> Exp {
        Exp::Lambda(Lambda { body: Box::new(body) })
    }

    pub fn app(fun: Exp, arg: Exp) -> Exp {
        Exp::App(App { fun: Box::new(fun), arg: Box::new(arg) })
    }

    pub fn int(i: i64) -> Exp {
        Exp::Literal(Literal { lit: Lit::int(i) })
    }

    pub fn str(s: &str) -> Exp {
        Exp::Literal(Literal { lit: Lit::str(s) })
    }

    /// The empty cons list.
    pub fn nil() -> Exp {
        Exp::Struct(Struct { tag: 0, args: vec![], family: DataFamily::Enum })
    }

    pub fn cons(head: Exp, tail: Exp) -> Exp {
        Exp::Struct(Struct { tag: 1, args: vec![head, tail], family: DataFamily::Enum })
    }

    /// Build a cons list from its elements.
    pub fn list<I>(items: I) -> Exp
    where
        I: IntoIterator<Item = Exp>,
        I::IntoIter: DoubleEndedIterator,
    {
        items.into_iter().rev().fold(Exp::nil(), |tail, head| Exp::cons(head, tail))
    }
}

// App
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct App {
    pub fun: Box<Exp>,
    pub arg: Box<Exp>,
}

impl From<App> for Exp {
    fn from(val: App) -> Self {
        Exp::App(val)
    }
}

// ExternalVar
//
//

/// A reference to a definition provided by the runtime.
///
/// External references are opaque to the rewriter: they never reduce, and a
/// match whose scrutinee is headed by one is left in place.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct ExternalVar {
    pub pack: PackageName,
    pub name: Ident,
    pub typ: TypeRef,
}

impl From<ExternalVar> for Exp {
    fn from(val: ExternalVar) -> Self {
        Exp::ExternalVar(val)
    }
}

// Match
//
//

/// A pattern match.
///
/// Each case body has been wrapped by the backend in one [`Lambda`] per
/// variable slot the pattern binds, so reducing a match is just applying the
/// chosen body to the bound values.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Match {
    pub on_exp: Box<Exp>,
    /// At least one case; cases are tried in order.
    pub cases: Vec<Case>,
}

impl From<Match> for Exp {
    fn from(val: Match) -> Self {
        Exp::Match(val)
    }
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Case {
    pub pattern: Pattern,
    pub body: Exp,
}

// LambdaVar
//
//

/// A bound variable, represented by a de Bruijn index; `0` refers to the
/// innermost enclosing binder.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct LambdaVar {
    pub idx: usize,
}

impl From<LambdaVar> for Exp {
    fn from(val: LambdaVar) -> Self {
        Exp::LambdaVar(val)
    }
}

// Lambda
//
//

/// A single-argument function.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Lambda {
    pub body: Box<Exp>,
}

impl From<Lambda> for Exp {
    fn from(val: Lambda) -> Self {
        Exp::Lambda(val)
    }
}

// Struct
//
//

/// A fully applied constructor: the tag identifies the constructor within
/// its data type, and the args are the field values in declaration order.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Struct {
    pub tag: usize,
    pub args: Vec<Exp>,
    /// Advisory layout marker for the code generator; irrelevant to
    /// reduction, so it does not participate in equality or hashing.
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub family: DataFamily,
}

impl From<Struct> for Exp {
    fn from(val: Struct) -> Self {
        Exp::Struct(val)
    }
}

// Literal
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Literal {
    pub lit: Lit,
}

impl From<Literal> for Exp {
    fn from(val: Literal) -> Self {
        Exp::Literal(val)
    }
}

impl From<Lit> for Exp {
    fn from(lit: Lit) -> Self {
        Exp::Literal(Literal { lit })
    }
}

// Recursion
//
//

/// A fixpoint. The inner expression is a [`Lambda`] whose argument stands
/// for the recursive reference itself.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Recursion {
    pub inner: Box<Exp>,
}

impl From<Recursion> for Exp {
    fn from(val: Recursion) -> Self {
        Exp::Recursion(val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_equality_ignores_the_family() {
        let a = Struct { tag: 0, args: vec![], family: DataFamily::Enum };
        let b = Struct { tag: 0, args: vec![], family: DataFamily::Struct };
        assert_eq!(a, b);
    }

    #[test]
    fn list_builds_a_cons_chain() {
        let list = Exp::list([Exp::int(1), Exp::int(2)]);
        assert_eq!(list, Exp::cons(Exp::int(1), Exp::cons(Exp::int(2), Exp::nil())));
    }
}
