use log::debug;

use ast::LookupError;
use ir::{Exp, FreeVars, Normalize, RewriteBudget};

use crate::ast2ir::ctors::synthesize_ctor;
use crate::ast2ir::ctx::{Ctx, ExprTag};
use crate::ast2ir::pats::convert_pattern;
use crate::result::BackendError;

// Compiler
//
//

/// Converts typed expressions into normalized, tagged IR.
///
/// Top-level bindings are memoized by `(package, name)`, so a binding is
/// converted once no matter how often it is referenced. The memo is only
/// ever grown and lives as long as the processing of one package map.
pub struct Compiler<'a> {
    map: &'a ast::PackageMap,
    memo: ast::HashMap<(ast::PackageName, ast::Ident), ExprTag>,
    rewrite_budget: usize,
}

impl<'a> Compiler<'a> {
    pub fn new(map: &'a ast::PackageMap, rewrite_budget: usize) -> Self {
        Compiler { map, memo: ast::HashMap::default(), rewrite_budget }
    }

    /// Convert and normalize one top-level binding.
    ///
    /// Every binding gets a fresh rewrite budget: a binding referencing many
    /// earlier ones must not starve because of their reduction work.
    pub fn convert_let(
        &mut self,
        pack: &ast::Package,
        decl: &ast::LetDecl,
    ) -> Result<ExprTag, BackendError> {
        let key = (pack.name.clone(), decl.name.clone());
        if let Some(tag) = self.memo.get(&key) {
            return Ok(tag.clone());
        }
        debug!("converting {}::{}", pack.name, decl.name);
        let mut budget = RewriteBudget::new(self.rewrite_budget);
        let mut ctx = Ctx::default();
        let tag = match decl.rec {
            ast::RecursionKind::NonRecursive => {
                self.convert_exp(pack, &ctx, &decl.body, &mut budget)?
            }
            ast::RecursionKind::Recursive => {
                ctx.bind(decl.name.clone());
                let body = self.convert_exp(pack, &ctx, &decl.body, &mut budget)?;
                self.fix(body, &mut budget)?
            }
        };
        debug_assert!(tag.ir.var_set().is_empty(), "top-level binding translated to an open term");
        self.memo.insert(key, tag.clone());
        Ok(tag)
    }

    /// Close over a translation whose index `0` is its own recursive
    /// reference.
    fn fix(&self, body: ExprTag, budget: &mut RewriteBudget) -> Result<ExprTag, BackendError> {
        let raw = Exp::Recursion(ir::Recursion { inner: Box::new(Exp::lambda(body.ir.clone())) });
        let ir = raw.normalize(budget)?;
        Ok(ExprTag::with_children(ir, [&body]))
    }

    fn convert_exp(
        &mut self,
        pack: &ast::Package,
        ctx: &Ctx,
        exp: &ast::Exp,
        budget: &mut RewriteBudget,
    ) -> Result<ExprTag, BackendError> {
        match exp {
            ast::Exp::Variable(var) => self.convert_variable(pack, ctx, var),
            ast::Exp::Global(global) => self.convert_global(pack, global),
            ast::Exp::Lambda(lambda) => {
                let mut inner = ctx.clone();
                inner.bind(lambda.param.clone());
                let body = self.convert_exp(pack, &inner, &lambda.body, budget)?;
                debug_assert!(
                    body.ir.max_lambda_var().is_none_or(|max| max < inner.depth() as i64),
                    "lambda body references a binder outside its scope"
                );
                let ir = Exp::lambda(body.ir.clone()).normalize(budget)?;
                Ok(ExprTag::with_children(ir, [&body]))
            }
            ast::Exp::App(app) => {
                let fun = self.convert_exp(pack, ctx, &app.fun, budget)?;
                let arg = self.convert_exp(pack, ctx, &app.arg, budget)?;
                let ir = Exp::app(fun.ir.clone(), arg.ir.clone()).normalize(budget)?;
                Ok(ExprTag::with_children(ir, [&fun, &arg]))
            }
            ast::Exp::Let(l) => match l.rec {
                ast::RecursionKind::NonRecursive => {
                    let bound = self.convert_exp(pack, ctx, &l.bound, budget)?;
                    let mut inner = ctx.clone();
                    inner.bind_let(l.name.clone(), bound.clone());
                    let body = self.convert_exp(pack, &inner, &l.body, budget)?;
                    Ok(ExprTag::with_children(body.ir.clone(), [&bound, &body]))
                }
                ast::RecursionKind::Recursive => {
                    let mut rec_ctx = ctx.clone();
                    rec_ctx.bind(l.name.clone());
                    let bound = self.convert_exp(pack, &rec_ctx, &l.bound, budget)?;
                    let wrapped = self.fix(bound, budget)?;
                    let mut inner = ctx.clone();
                    inner.bind_let(l.name.clone(), wrapped.clone());
                    let body = self.convert_exp(pack, &inner, &l.body, budget)?;
                    Ok(ExprTag::with_children(body.ir.clone(), [&wrapped, &body]))
                }
            },
            ast::Exp::Match(m) => {
                let scrutinee = self.convert_exp(pack, ctx, &m.on_exp, budget)?;
                let mut parts = vec![scrutinee.clone()];
                let mut cases = Vec::with_capacity(m.cases.len());
                for case in &m.cases {
                    let names = case.pattern.names();
                    let pattern = convert_pattern(self.map, &names, &case.pattern)?;
                    // The first name becomes the innermost binder, so the
                    // names enter back to front.
                    let mut inner = ctx.clone();
                    for name in names.iter().rev() {
                        inner.bind(name.clone());
                    }
                    let body = self.convert_exp(pack, &inner, &case.body, budget)?;
                    let mut wrapped = body.ir.clone();
                    for _ in 0..names.len() {
                        wrapped = Exp::lambda(wrapped);
                    }
                    cases.push(ir::Case { pattern, body: wrapped });
                    parts.push(body);
                }
                let raw = Exp::Match(ir::Match { on_exp: Box::new(scrutinee.ir.clone()), cases });
                let ir = raw.normalize(budget)?;
                Ok(ExprTag::with_children(ir, parts.iter()))
            }
            ast::Exp::Literal(lit) => Ok(ExprTag::leaf(Exp::from(lit.lit.clone()))),
        }
    }

    fn convert_variable(
        &mut self,
        pack: &ast::Package,
        ctx: &Ctx,
        var: &ast::Variable,
    ) -> Result<ExprTag, BackendError> {
        if let Some(tag) = ctx.lookup(&var.name) {
            return Ok(tag.clone());
        }
        // A name that is not locally bound refers to a top-level binding of
        // the current package.
        if let Some(decl) = pack.lookup_let(&var.name) {
            return self.convert_let(pack, decl);
        }
        Err(LookupError::UndefinedVariable { name: var.name.to_string() }.into())
    }

    fn convert_global(
        &mut self,
        pack: &ast::Package,
        global: &ast::Global,
    ) -> Result<ExprTag, BackendError> {
        let map = self.map;
        let foreign = global.pack != pack.name;
        if foreign && !pack.imports_name(&global.pack, &global.name) {
            return Err(LookupError::NotImported {
                pack: global.pack.to_string(),
                name: global.name.to_string(),
            }
            .into());
        }
        match global.kind {
            // References into another package are resolved in the origin
            // package, starting from an empty environment.
            ast::GlobalKind::LetBound => {
                let origin = if foreign { map.lookup(&global.pack)? } else { pack };
                let decl = origin.lookup_let(&global.name).ok_or_else(|| {
                    LookupError::UndefinedLet {
                        pack: global.pack.to_string(),
                        name: global.name.to_string(),
                    }
                })?;
                self.convert_let(origin, decl)
            }
            ast::GlobalKind::Constructor => {
                let (data, idx) = map.lookup_ctor(&global.pack, &global.name)?;
                let arity = data.ctors[idx].arity;
                Ok(ExprTag::leaf(synthesize_ctor(idx, arity, data.family)))
            }
            ast::GlobalKind::External => {
                let origin = if foreign { map.lookup(&global.pack)? } else { pack };
                let decl = origin.lookup_external(&global.name).ok_or_else(|| {
                    LookupError::UndefinedLet {
                        pack: global.pack.to_string(),
                        name: global.name.to_string(),
                    }
                })?;
                Ok(ExprTag::leaf(Exp::ExternalVar(ir::ExternalVar {
                    pack: global.pack.clone(),
                    name: global.name.clone(),
                    typ: decl.typ.clone(),
                })))
            }
        }
    }
}
