use ast::{HashMap, HashSet, Ident};
use ir::{Exp, Shift};

// ExprTag
//
//

/// The IR translation of an expression, together with the set of normalized
/// IR terms reachable from it.
///
/// The children set closes over every sub-IR produced while translating the
/// expression, including intermediate results that normalization rewrote
/// away at the top. A cache uses it to enumerate all inner expressions worth
/// hashing.
#[derive(Debug, Clone)]
pub struct ExprTag {
    pub ir: Exp,
    pub children: HashSet<Exp>,
}

impl ExprTag {
    /// Tag an expression with no translated subexpressions of its own.
    pub fn leaf(ir: Exp) -> Self {
        let mut children = HashSet::default();
        collect_sub_exprs(&ir, &mut children);
        ExprTag { ir, children }
    }

    /// Tag an expression built out of previously translated parts: the
    /// children are the structural subterms of `ir` plus each part's IR and
    /// children.
    pub fn with_children<'a, I>(ir: Exp, parts: I) -> Self
    where
        I: IntoIterator<Item = &'a ExprTag>,
    {
        let mut tag = ExprTag::leaf(ir);
        for part in parts {
            tag.children.insert(part.ir.clone());
            tag.children.extend(part.children.iter().cloned());
        }
        tag
    }
}

impl Shift for ExprTag {
    fn shift_above(&mut self, cutoff: usize) {
        self.ir.shift_above(cutoff);
        self.children = self
            .children
            .drain()
            .map(|mut child| {
                child.shift_above(cutoff);
                child
            })
            .collect();
    }
}

fn collect_sub_exprs(exp: &Exp, out: &mut HashSet<Exp>) {
    out.insert(exp.clone());
    match exp {
        Exp::App(app) => {
            collect_sub_exprs(&app.fun, out);
            collect_sub_exprs(&app.arg, out);
        }
        Exp::ExternalVar(_) | Exp::LambdaVar(_) | Exp::Literal(_) => {}
        Exp::Match(m) => {
            collect_sub_exprs(&m.on_exp, out);
            for case in &m.cases {
                collect_sub_exprs(&case.body, out);
            }
        }
        Exp::Lambda(lambda) => collect_sub_exprs(&lambda.body, out),
        Exp::Struct(s) => {
            for arg in &s.args {
                collect_sub_exprs(arg, out);
            }
        }
        Exp::Recursion(rec) => collect_sub_exprs(&rec.inner, out),
    }
}

// Ctx
//
//

/// The conversion environment: what every visible name translates to.
///
/// Entering a binder shifts all known translations, because their free
/// indices now have one more binder between themselves and their binding
/// sites, and then maps the freshly bound name to index `0`.
#[derive(Debug, Clone, Default)]
pub struct Ctx {
    name_map: HashMap<Ident, ExprTag>,
    binder_stack: Vec<Ident>,
}

impl Ctx {
    pub fn lookup(&self, name: &Ident) -> Option<&ExprTag> {
        self.name_map.get(name)
    }

    /// Enter one binder. Shadowing an existing name is fine; the newer
    /// binding wins until the branch of conversion using this context ends.
    pub fn bind(&mut self, name: Ident) {
        for tag in self.name_map.values_mut() {
            tag.shift();
        }
        self.name_map.insert(name.clone(), ExprTag::leaf(Exp::var(0)));
        self.binder_stack.push(name);
    }

    /// Make a let-bound translation visible without entering a binder.
    pub fn bind_let(&mut self, name: Ident, tag: ExprTag) {
        self.name_map.insert(name, tag);
    }

    /// Number of binders entered so far.
    pub fn depth(&self) -> usize {
        self.binder_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_shifts_older_entries() {
        let mut ctx = Ctx::default();
        ctx.bind(Ident::from_string("x"));
        ctx.bind(Ident::from_string("y"));
        assert_eq!(ctx.lookup(&Ident::from_string("y")).unwrap().ir, Exp::var(0));
        assert_eq!(ctx.lookup(&Ident::from_string("x")).unwrap().ir, Exp::var(1));
        assert_eq!(ctx.depth(), 2);
    }

    #[test]
    fn let_bound_entries_shift_like_everything_else() {
        let mut ctx = Ctx::default();
        ctx.bind(Ident::from_string("x"));
        ctx.bind_let(Ident::from_string("pair"), ExprTag::leaf(Exp::app(Exp::var(0), Exp::int(1))));
        ctx.bind(Ident::from_string("y"));
        assert_eq!(
            ctx.lookup(&Ident::from_string("pair")).unwrap().ir,
            Exp::app(Exp::var(1), Exp::int(1))
        );
    }
}
