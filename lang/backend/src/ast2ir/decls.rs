use printer::Print;

use ir::{match_one, Env, PatternMatch, DEFAULT_BUDGET};

use crate::ast2ir::ctx::ExprTag;
use crate::ast2ir::exprs::Compiler;
use crate::result::BackendError;

// BackendCfg
//
//

#[derive(Debug, Clone)]
pub struct BackendCfg {
    /// Head-reduction steps allowed per top-level binding.
    pub rewrite_budget: usize,
}

impl Default for BackendCfg {
    fn default() -> Self {
        BackendCfg { rewrite_budget: DEFAULT_BUDGET }
    }
}

// Normalized output
//
//

/// A top-level binding with its normalized IR attached.
///
/// The typed expression is carried along unchanged; the tag is what a code
/// generator or cache consumes.
#[derive(Debug, Clone)]
pub struct NormalizedLet {
    pub name: ast::Ident,
    pub rec: ast::RecursionKind,
    pub body: ast::Exp,
    pub tag: ExprTag,
}

#[derive(Debug, Clone)]
pub struct NormalizedPackage {
    pub name: ast::PackageName,
    pub lets: Vec<NormalizedLet>,
}

/// Convert every package of a compilation.
///
/// Packages are processed in declaration order, and bindings within a
/// package likewise, so references to earlier bindings hit the memo.
pub fn normalize_packages(
    map: &ast::PackageMap,
    cfg: &BackendCfg,
) -> Result<Vec<NormalizedPackage>, BackendError> {
    let mut compiler = Compiler::new(map, cfg.rewrite_budget);
    let mut out = Vec::new();
    for pack in map.packages() {
        let mut lets = Vec::with_capacity(pack.lets.len());
        for decl in &pack.lets {
            let tag = compiler.convert_let(pack, decl)?;
            check_exhaustive(&tag.ir)?;
            lets.push(NormalizedLet {
                name: decl.name.clone(),
                rec: decl.rec,
                body: decl.body.clone(),
                tag,
            });
        }
        out.push(NormalizedPackage { name: pack.name.clone(), lets });
    }
    Ok(out)
}

/// Report matches that provably cover no case.
///
/// The rewriter leaves a match in place in two situations: some case is
/// undecided, or every case definitely rejects the scrutinee. The second
/// one means the program is missing a case, which is a diagnostic rather
/// than something the rewriter should abort on mid-term.
fn check_exhaustive(exp: &ir::Exp) -> Result<(), BackendError> {
    match exp {
        ir::Exp::App(app) => {
            check_exhaustive(&app.fun)?;
            check_exhaustive(&app.arg)
        }
        ir::Exp::ExternalVar(_) | ir::Exp::LambdaVar(_) | ir::Exp::Literal(_) => Ok(()),
        ir::Exp::Match(m) => {
            let all_rejected = m.cases.iter().all(|case| {
                matches!(
                    match_one(&case.pattern, &*m.on_exp, Env::<ir::Exp>::default()),
                    PatternMatch::NoMatch
                )
            });
            if all_rejected {
                return Err(BackendError::NonExhaustiveMatch {
                    scrutinee: m.on_exp.print_to_string(None),
                });
            }
            check_exhaustive(&m.on_exp)?;
            for case in &m.cases {
                check_exhaustive(&case.body)?;
            }
            Ok(())
        }
        ir::Exp::Lambda(lambda) => check_exhaustive(&lambda.body),
        ir::Exp::Struct(s) => {
            for arg in &s.args {
                check_exhaustive(arg)?;
            }
            Ok(())
        }
        ir::Exp::Recursion(rec) => check_exhaustive(&rec.inner),
    }
}
