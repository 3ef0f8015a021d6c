use ast::DataFamily;
use ir::{Exp, Struct};

/// Build the function term for a constructor.
///
/// A constructor of arity `n` becomes `n` nested lambdas around a struct
/// whose fields reference the binders in declaration order, so the first
/// declared field is the outermost binder:
///
/// ```text
/// \.\. #tag(@1, @0)
/// ```
///
/// A nullary constructor is just the struct.
pub fn synthesize_ctor(tag: usize, arity: usize, family: DataFamily) -> Exp {
    let args = (0..arity).rev().map(Exp::var).collect();
    let mut exp = Exp::Struct(Struct { tag, args, family });
    for _ in 0..arity {
        exp = Exp::lambda(exp);
    }
    exp
}
