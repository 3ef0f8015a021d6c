use pretty::DocAllocator;
use printer::theme::ThemeExt;
use printer::tokens::{BACKSLASH, DOUBLE_COLON, EQ, FAT_ARROW, IN, LET, LET_REC, MATCH};
use printer::util::ParensExt;
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::decls::RecursionKind;
use crate::ident::{Ident, PackageName};
use crate::lit::Lit;
use crate::pat::Pattern;

// Exp
//
//

/// A type-checked, name-resolved expression.
///
/// Multi-argument functions are represented as nested single-argument
/// lambdas, and applications as nested single-argument applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exp {
    Variable(Variable),
    Global(Global),
    Lambda(Lambda),
    App(App),
    Let(Let),
    Match(Match),
    Literal(Literal),
}

impl Print for Exp {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Exp::Variable(e) => e.print(cfg, alloc),
            Exp::Global(e) => e.print(cfg, alloc),
            Exp::Lambda(e) => e.print(cfg, alloc),
            Exp::App(e) => e.print(cfg, alloc),
            Exp::Let(e) => e.print(cfg, alloc),
            Exp::Match(e) => e.print(cfg, alloc),
            Exp::Literal(e) => e.print(cfg, alloc),
        }
    }
}

impl Exp {
    /// Whether printing this expression in head position needs parentheses.
    fn is_compound(&self) -> bool {
        matches!(self, Exp::Lambda(_) | Exp::Let(_) | Exp::Match(_))
    }
}

// Variable
//
//

/// A local variable bound by a lambda, a let, or a match branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: Ident,
}

impl From<Variable> for Exp {
    fn from(val: Variable) -> Self {
        Exp::Variable(val)
    }
}

impl Print for Variable {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        alloc.text(&self.name.id)
    }
}

// Global
//
//

/// What kind of top-level definition a global reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalKind {
    LetBound,
    Constructor,
    External,
}

/// A reference to a top-level definition, possibly in another package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Global {
    pub pack: PackageName,
    pub name: Ident,
    pub kind: GlobalKind,
}

impl From<Global> for Exp {
    fn from(val: Global) -> Self {
        Exp::Global(val)
    }
}

impl Print for Global {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Global { pack, name, kind } = self;
        let name = match kind {
            GlobalKind::Constructor => alloc.ctor(&name.id),
            _ => alloc.text(&name.id),
        };
        alloc.text(&pack.id).append(DOUBLE_COLON).append(name)
    }
}

// Lambda
//
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lambda {
    pub param: Ident,
    pub body: Box<Exp>,
}

impl From<Lambda> for Exp {
    fn from(val: Lambda) -> Self {
        Exp::Lambda(val)
    }
}

impl Print for Lambda {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Lambda { param, body } = self;
        alloc
            .text(BACKSLASH)
            .append(alloc.text(&param.id))
            .append(alloc.space())
            .append(FAT_ARROW)
            .append(alloc.space())
            .append(body.print(cfg, alloc))
    }
}

// App
//
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub fun: Box<Exp>,
    pub arg: Box<Exp>,
}

impl From<App> for Exp {
    fn from(val: App) -> Self {
        Exp::App(val)
    }
}

impl Print for App {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let App { fun, arg } = self;
        fun.print(cfg, alloc)
            .opt_parens(fun.is_compound())
            .append(arg.print(cfg, alloc).parens())
    }
}

// Let
//
//

/// A local let binding. If marked recursive, the bound expression may refer
/// to `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Let {
    pub name: Ident,
    pub rec: RecursionKind,
    pub bound: Box<Exp>,
    pub body: Box<Exp>,
}

impl From<Let> for Exp {
    fn from(val: Let) -> Self {
        Exp::Let(val)
    }
}

impl Print for Let {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Let { name, rec, bound, body } = self;
        let keyword = if rec.is_recursive() { LET_REC } else { LET };
        alloc
            .keyword(keyword)
            .append(alloc.space())
            .append(alloc.text(&name.id))
            .append(alloc.space())
            .append(EQ)
            .append(alloc.space())
            .append(bound.print(cfg, alloc))
            .append(alloc.space())
            .append(alloc.keyword(IN))
            .append(alloc.line())
            .append(body.print(cfg, alloc))
            .group()
    }
}

// Match
//
//

#[derive(Debug, Clone, PartialEq, Eq)]
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

impl Print for Match {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Match { on_exp, cases } = self;
        let sep = alloc.text(printer::tokens::COMMA).append(alloc.line());
        let cases = alloc
            .line()
            .append(alloc.intersperse(cases.iter().map(|case| case.print(cfg, alloc)), sep))
            .nest(cfg.indent)
            .append(alloc.line())
            .braces()
            .group();
        alloc
            .keyword(MATCH)
            .append(alloc.space())
            .append(on_exp.print(cfg, alloc).opt_parens(on_exp.is_compound()))
            .append(alloc.space())
            .append(cases)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub pattern: Pattern,
    pub body: Exp,
}

impl Print for Case {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Case { pattern, body } = self;
        pattern
            .print(cfg, alloc)
            .append(alloc.space())
            .append(FAT_ARROW)
            .append(alloc.space())
            .append(body.print(cfg, alloc))
    }
}

// Literal
//
//

#[derive(Debug, Clone, PartialEq, Eq)]
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

impl Print for Literal {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        self.lit.print(cfg, alloc)
    }
}
