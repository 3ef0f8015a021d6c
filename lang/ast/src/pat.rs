use pretty::DocAllocator;
use printer::theme::ThemeExt;
use printer::tokens::{AT, DOUBLE_COLON, PIPE, STAR, UNDERSCORE};
use printer::{print_comma_separated, Alloc, Builder, Print, PrintCfg};

use crate::ident::{Ident, PackageName};
use crate::lit::Lit;

// Pattern
//
//

/// A pattern as it appears in the surface program, with user names at the
/// binding sites. The backend replaces names by dense slot indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    WildCard,
    Literal(Lit),
    Var(Ident),
    /// Binds `name` to the whole matched value while also matching `pattern`.
    Named { name: Ident, pattern: Box<Pattern> },
    /// A list pattern. At most one part may be a splice.
    List(Vec<ListPart>),
    /// A constructor pattern, matching the fields positionally.
    Struct { pack: PackageName, ctor: Ident, params: Vec<Pattern> },
    /// An or-pattern. All alternatives bind the same names.
    Union { head: Box<Pattern>, rest: Vec<Pattern> },
    /// A string pattern, matching a concatenation of parts.
    Str(Vec<StrPart>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPart {
    /// `*_` or `*name`: matches any run of elements.
    Splice(Option<Ident>),
    Item(Pattern),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrPart {
    WildStr,
    NamedStr(Ident),
    LitStr(String),
}

impl Pattern {
    /// The names bound by this pattern, in first-occurrence order.
    ///
    /// For a union pattern only the head is consulted; the type checker has
    /// already ensured that all alternatives bind the same names.
    pub fn names(&self) -> Vec<Ident> {
        let mut out = Vec::new();
        self.collect_names(&mut out);
        out
    }

    fn collect_names(&self, out: &mut Vec<Ident>) {
        fn push(name: &Ident, out: &mut Vec<Ident>) {
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        match self {
            Pattern::WildCard | Pattern::Literal(_) => {}
            Pattern::Var(name) => push(name, out),
            Pattern::Named { name, pattern } => {
                push(name, out);
                pattern.collect_names(out);
            }
            Pattern::List(parts) => {
                for part in parts {
                    match part {
                        ListPart::Splice(Some(name)) => push(name, out),
                        ListPart::Splice(None) => {}
                        ListPart::Item(pattern) => pattern.collect_names(out),
                    }
                }
            }
            Pattern::Struct { params, .. } => {
                for param in params {
                    param.collect_names(out);
                }
            }
            Pattern::Union { head, .. } => head.collect_names(out),
            Pattern::Str(parts) => {
                for part in parts {
                    if let StrPart::NamedStr(name) = part {
                        push(name, out);
                    }
                }
            }
        }
    }
}

impl Print for Pattern {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Pattern::WildCard => alloc.text(UNDERSCORE),
            Pattern::Literal(lit) => lit.print(cfg, alloc),
            Pattern::Var(name) => alloc.text(&name.id),
            Pattern::Named { name, pattern } => alloc
                .text(&name.id)
                .append(alloc.space())
                .append(AT)
                .append(alloc.space())
                .append(pattern.print(cfg, alloc)),
            Pattern::List(parts) => {
                let sep = alloc.text(printer::tokens::COMMA).append(alloc.space());
                alloc
                    .intersperse(parts.iter().map(|part| part.print(cfg, alloc)), sep)
                    .brackets()
            }
            Pattern::Struct { pack, ctor, params } => {
                let head = alloc.text(&pack.id).append(DOUBLE_COLON).append(alloc.ctor(&ctor.id));
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
                let sep = alloc.space().append(printer::tokens::PLUS_PLUS).append(alloc.space());
                alloc.intersperse(parts.iter().map(|part| part.print(cfg, alloc)), sep)
            }
        }
    }
}

impl Print for ListPart {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            ListPart::Splice(None) => alloc.text(STAR).append(UNDERSCORE),
            ListPart::Splice(Some(name)) => alloc.text(STAR).append(alloc.text(&name.id)),
            ListPart::Item(pattern) => pattern.print(cfg, alloc),
        }
    }
}

impl Print for StrPart {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            StrPart::WildStr => alloc.text(UNDERSCORE),
            StrPart::NamedStr(name) => alloc.text(&name.id),
            StrPart::LitStr(s) => alloc.lit(format!("{s:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_first_occurrence_ordered() {
        let pat = Pattern::List(vec![
            ListPart::Item(Pattern::Var(Ident::from_string("x"))),
            ListPart::Splice(Some(Ident::from_string("rest"))),
        ]);
        assert_eq!(pat.names(), vec![Ident::from_string("x"), Ident::from_string("rest")]);
    }

    #[test]
    fn union_names_come_from_the_head() {
        let pat = Pattern::Union {
            head: Box::new(Pattern::Var(Ident::from_string("x"))),
            rest: vec![Pattern::Var(Ident::from_string("x"))],
        };
        assert_eq!(pat.names(), vec![Ident::from_string("x")]);
    }
}
