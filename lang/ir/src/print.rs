use pretty::DocAllocator;
use printer::theme::ThemeExt;
use printer::tokens::{
    AT, BACKSLASH, COMMA, DOLLAR, DOUBLE_COLON, FAT_ARROW, FIX, HASH, MATCH, PIPE, PLUS_PLUS,
    STAR, UNDERSCORE,
};
use printer::util::ParensExt;
use printer::{print_comma_separated, Alloc, Builder, Print, PrintCfg};

use crate::exp::*;
use crate::pattern::{ListPart, Pattern, StrPart};

// Exp
//
//

impl Exp {
    fn is_compound(&self) -> bool {
        matches!(self, Exp::Lambda(_) | Exp::Match(_) | Exp::Recursion(_))
    }
}

impl Print for Exp {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Exp::App(e) => e.print(cfg, alloc),
            Exp::ExternalVar(e) => e.print(cfg, alloc),
            Exp::Match(e) => e.print(cfg, alloc),
            Exp::LambdaVar(e) => e.print(cfg, alloc),
            Exp::Lambda(e) => e.print(cfg, alloc),
            Exp::Struct(e) => e.print(cfg, alloc),
            Exp::Literal(e) => e.lit.print(cfg, alloc),
            Exp::Recursion(e) => e.print(cfg, alloc),
        }
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

impl Print for ExternalVar {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let ExternalVar { pack, name, .. } = self;
        alloc.text(&pack.id).append(DOUBLE_COLON).append(alloc.text(&name.id))
    }
}

impl Print for Match {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Match { on_exp, cases } = self;
        let sep = alloc.text(COMMA).append(alloc.line());
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

impl Print for LambdaVar {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        alloc.text(format!("{AT}{}", self.idx))
    }
}

impl Print for Lambda {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Lambda { body } = self;
        alloc
            .text(BACKSLASH)
            .append(FAT_ARROW)
            .append(alloc.space())
            .append(body.print(cfg, alloc))
    }
}

impl Print for Struct {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Struct { tag, args, .. } = self;
        let head = alloc.ctor(&format!("{HASH}{tag}"));
        if args.is_empty() {
            head
        } else {
            head.append(print_comma_separated(args, cfg, alloc).parens())
        }
    }
}

impl Print for Recursion {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Recursion { inner } = self;
        alloc
            .keyword(FIX)
            .append(alloc.space())
            .append(inner.print(cfg, alloc).opt_parens(inner.is_compound()))
    }
}

// Pattern
//
//

impl Print for Pattern {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Pattern::WildCard => alloc.text(UNDERSCORE),
            Pattern::Literal(lit) => lit.print(cfg, alloc),
            Pattern::Var(name) => alloc.text(format!("{DOLLAR}{name}")),
            Pattern::Named { name, pattern } => alloc
                .text(format!("{DOLLAR}{name}"))
                .append(alloc.space())
                .append(AT)
                .append(alloc.space())
                .append(pattern.print(cfg, alloc)),
            Pattern::List(parts) => {
                let sep = alloc.text(COMMA).append(alloc.space());
                alloc
                    .intersperse(parts.iter().map(|part| part.print(cfg, alloc)), sep)
                    .brackets()
            }
            Pattern::Struct { tag, params, .. } => {
                let head = match tag {
                    Some(tag) => alloc.ctor(&format!("{HASH}{tag}")),
                    None => alloc.ctor(&format!("{HASH}{UNDERSCORE}")),
                };
                if params.is_empty() {
                    head
                } else {
                    head.append(print_comma_separated(params, cfg, alloc).parens())
                }
            }
            Pattern::Union { head, rest } => {
                let sep = alloc.space().append(PIPE).append(alloc.space());
                alloc.intersperse(
                    std::iter::once(head.print(cfg, alloc))
                        .chain(rest.iter().map(|pat| pat.print(cfg, alloc))),
                    sep,
                )
            }
            Pattern::Str(parts) => {
                let sep = alloc.space().append(PLUS_PLUS).append(alloc.space());
                alloc.intersperse(parts.iter().map(|part| part.print(cfg, alloc)), sep)
            }
        }
    }
}

impl Print for ListPart {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            ListPart::Splice(None) => alloc.text(STAR).append(UNDERSCORE),
            ListPart::Splice(Some(name)) => alloc.text(STAR).append(format!("{DOLLAR}{name}")),
            ListPart::Item(pattern) => pattern.print(cfg, alloc),
        }
    }
}

impl Print for StrPart {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            StrPart::WildStr => alloc.text(UNDERSCORE),
            StrPart::NamedStr(name) => alloc.text(format!("{DOLLAR}{name}")),
            StrPart::LitStr(s) => alloc.lit(format!("{s:?}")),
        }
    }
}
