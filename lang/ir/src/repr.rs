use ast::{DataFamily, Ident, Lit, PackageName, TypeRef};
use miette::Diagnostic;
use num_bigint::BigInt;
use thiserror::Error;

use crate::exp::*;
use crate::pattern::{ListPart, Pattern, StrPart};
use crate::result::InvalidPattern;

// Repr
//
//

/// A deterministic textual encoding of IR terms and patterns.
///
/// The encoding is used as a stable cache key: structurally equal terms
/// produce byte-identical output, and [`parse_exp`]/[`parse_pattern`] invert
/// it exactly. It is not meant to be read by people; see the `Print`
/// instances for that.
///
/// Strings are single-quote delimited with `'` and `\` backslash-escaped.
/// The advisory data family is not part of the encoding, matching its
/// exclusion from equality.
pub trait Repr {
    fn repr_into(&self, out: &mut String);

    fn repr(&self) -> String {
        let mut out = String::new();
        self.repr_into(&mut out);
        out
    }
}

fn quote_into(s: &str, out: &mut String) {
    out.push('\'');
    for c in s.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
}

fn opt_into(opt: &Option<usize>, out: &mut String) {
    match opt {
        Some(n) => {
            out.push_str("Some(");
            out.push_str(&n.to_string());
            out.push(')');
        }
        None => out.push_str("None"),
    }
}

impl Repr for Lit {
    fn repr_into(&self, out: &mut String) {
        match self {
            Lit::Int(i) => out.push_str(&i.to_string()),
            Lit::Str(s) => quote_into(s, out),
        }
    }
}

impl Repr for Exp {
    fn repr_into(&self, out: &mut String) {
        match self {
            Exp::App(App { fun, arg }) => {
                out.push_str("App(");
                fun.repr_into(out);
                out.push(',');
                arg.repr_into(out);
                out.push(')');
            }
            Exp::ExternalVar(ExternalVar { pack, name, typ }) => {
                out.push_str("ExternalVar(");
                quote_into(&pack.id, out);
                out.push(',');
                quote_into(&name.id, out);
                out.push(',');
                quote_into(&typ.id, out);
                out.push(')');
            }
            Exp::Match(Match { on_exp, cases }) => {
                out.push_str("Match(");
                on_exp.repr_into(out);
                for case in cases {
                    out.push(',');
                    case.pattern.repr_into(out);
                    out.push(',');
                    case.body.repr_into(out);
                }
                out.push(')');
            }
            Exp::LambdaVar(LambdaVar { idx }) => {
                out.push_str("LambdaVar(");
                out.push_str(&idx.to_string());
                out.push(')');
            }
            Exp::Lambda(Lambda { body }) => {
                out.push_str("Lambda(");
                body.repr_into(out);
                out.push(')');
            }
            Exp::Struct(Struct { tag, args, .. }) => {
                out.push_str("Struct(");
                out.push_str(&tag.to_string());
                for arg in args {
                    out.push(',');
                    arg.repr_into(out);
                }
                out.push(')');
            }
            Exp::Literal(Literal { lit }) => {
                out.push_str("Literal(");
                lit.repr_into(out);
                out.push(')');
            }
            Exp::Recursion(Recursion { inner }) => {
                out.push_str("Recursion(");
                inner.repr_into(out);
                out.push(')');
            }
        }
    }
}

impl Repr for Pattern {
    fn repr_into(&self, out: &mut String) {
        match self {
            Pattern::WildCard => out.push_str("WildCard"),
            Pattern::Literal(lit) => {
                out.push_str("Literal(");
                lit.repr_into(out);
                out.push(')');
            }
            Pattern::Var(name) => {
                out.push_str("Var(");
                out.push_str(&name.to_string());
                out.push(')');
            }
            Pattern::Named { name, pattern } => {
                out.push_str("Named(");
                out.push_str(&name.to_string());
                out.push(',');
                pattern.repr_into(out);
                out.push(')');
            }
            Pattern::List(parts) => {
                out.push_str("ListPat(");
                let mut first = true;
                for part in parts {
                    if !first {
                        out.push(',');
                    }
                    first = false;
                    match part {
                        ListPart::Splice(opt) => {
                            out.push_str("Left(");
                            opt_into(opt, out);
                            out.push(')');
                        }
                        ListPart::Item(pattern) => {
                            out.push_str("Right(");
                            pattern.repr_into(out);
                            out.push(')');
                        }
                    }
                }
                out.push(')');
            }
            Pattern::Struct { tag, params, .. } => {
                out.push_str("PositionalStruct(");
                opt_into(tag, out);
                for param in params {
                    out.push(',');
                    param.repr_into(out);
                }
                out.push(')');
            }
            Pattern::Union { head, rest } => {
                out.push_str("Union(");
                head.repr_into(out);
                for pat in rest {
                    out.push(',');
                    pat.repr_into(out);
                }
                out.push(')');
            }
            Pattern::Str(parts) => {
                out.push_str("StrPat(");
                let mut first = true;
                for part in parts {
                    if !first {
                        out.push(',');
                    }
                    first = false;
                    match part {
                        StrPart::WildStr => out.push_str("WildStr"),
                        StrPart::NamedStr(name) => {
                            out.push_str("NamedStr(");
                            out.push_str(&name.to_string());
                            out.push(')');
                        }
                        StrPart::LitStr(s) => {
                            out.push_str("LitStr(");
                            quote_into(s, out);
                            out.push(')');
                        }
                    }
                }
                out.push(')');
            }
        }
    }
}

// Parsing
//
//

#[derive(Error, Diagnostic, Debug)]
pub enum ReprError {
    #[error("Unexpected input at byte {at}: expected {expected}")]
    #[diagnostic(code("R-001"))]
    Unexpected { at: usize, expected: String },
    #[error("Trailing input at byte {at}")]
    #[diagnostic(code("R-002"))]
    Trailing { at: usize },
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidPattern(#[from] InvalidPattern),
}

/// Parse the output of [`Repr::repr`] for an expression.
///
/// Parsed structs and struct patterns carry [`DataFamily::Enum`], since the
/// family is not encoded.
pub fn parse_exp(input: &str) -> Result<Exp, ReprError> {
    let mut parser = Parser::new(input);
    let exp = parser.exp()?;
    parser.finish()?;
    Ok(exp)
}

/// Parse the output of [`Repr::repr`] for a pattern.
pub fn parse_pattern(input: &str) -> Result<Pattern, ReprError> {
    let mut parser = Parser::new(input);
    let pattern = parser.pattern()?;
    parser.finish()?;
    Ok(pattern)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn error(&self, expected: &str) -> ReprError {
        ReprError::Unexpected { at: self.pos, expected: expected.to_owned() }
    }

    fn finish(&self) -> Result<(), ReprError> {
        if self.pos == self.input.len() {
            Ok(())
        } else {
            Err(ReprError::Trailing { at: self.pos })
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), ReprError> {
        if self.eat(token) { Ok(()) } else { Err(self.error(token)) }
    }

    fn digits(&mut self) -> Result<&'a str, ReprError> {
        let len = self.rest().bytes().take_while(|b| b.is_ascii_digit()).count();
        if len == 0 {
            return Err(self.error("a number"));
        }
        let digits = &self.rest()[..len];
        self.pos += len;
        Ok(digits)
    }

    fn usize(&mut self) -> Result<usize, ReprError> {
        let at = self.pos;
        self.digits()?
            .parse()
            .map_err(|_| ReprError::Unexpected { at, expected: "a number".to_owned() })
    }

    fn int(&mut self) -> Result<BigInt, ReprError> {
        let negative = self.eat("-");
        let at = self.pos;
        let magnitude: BigInt = self
            .digits()?
            .parse()
            .map_err(|_| ReprError::Unexpected { at, expected: "an integer".to_owned() })?;
        Ok(if negative { -magnitude } else { magnitude })
    }

    fn quoted(&mut self) -> Result<String, ReprError> {
        self.expect("'")?;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        loop {
            let Some((offset, c)) = chars.next() else {
                return Err(self.error("a closing quote"));
            };
            match c {
                '\'' => {
                    self.pos += offset + 1;
                    return Ok(out);
                }
                '\\' => {
                    let Some((_, escaped)) = chars.next() else {
                        return Err(self.error("an escaped character"));
                    };
                    out.push(escaped);
                }
                _ => out.push(c),
            }
        }
    }

    fn opt_usize(&mut self) -> Result<Option<usize>, ReprError> {
        if self.eat("None") {
            return Ok(None);
        }
        self.expect("Some(")?;
        let n = self.usize()?;
        self.expect(")")?;
        Ok(Some(n))
    }

    fn lit(&mut self) -> Result<Lit, ReprError> {
        if self.rest().starts_with('\'') {
            Ok(Lit::Str(self.quoted()?))
        } else {
            Ok(Lit::Int(self.int()?))
        }
    }

    fn exp(&mut self) -> Result<Exp, ReprError> {
        if self.eat("App(") {
            let fun = self.exp()?;
            self.expect(",")?;
            let arg = self.exp()?;
            self.expect(")")?;
            Ok(Exp::app(fun, arg))
        } else if self.eat("ExternalVar(") {
            let pack = self.quoted()?;
            self.expect(",")?;
            let name = self.quoted()?;
            self.expect(",")?;
            let typ = self.quoted()?;
            self.expect(")")?;
            Ok(Exp::ExternalVar(ExternalVar {
                pack: PackageName { id: pack },
                name: Ident { id: name },
                typ: TypeRef { id: typ },
            }))
        } else if self.eat("Match(") {
            let on_exp = self.exp()?;
            let mut cases = Vec::new();
            while self.eat(",") {
                let pattern = self.pattern()?;
                self.expect(",")?;
                let body = self.exp()?;
                cases.push(Case { pattern, body });
            }
            self.expect(")")?;
            if cases.is_empty() {
                return Err(self.error("at least one match case"));
            }
            Ok(Exp::Match(Match { on_exp: Box::new(on_exp), cases }))
        } else if self.eat("LambdaVar(") {
            let idx = self.usize()?;
            self.expect(")")?;
            Ok(Exp::var(idx))
        } else if self.eat("Lambda(") {
            let body = self.exp()?;
            self.expect(")")?;
            Ok(Exp::lambda(body))
        } else if self.eat("Struct(") {
            let tag = self.usize()?;
            let mut args = Vec::new();
            while self.eat(",") {
                args.push(self.exp()?);
            }
            self.expect(")")?;
            Ok(Exp::Struct(Struct { tag, args, family: DataFamily::Enum }))
        } else if self.eat("Literal(") {
            let lit = self.lit()?;
            self.expect(")")?;
            Ok(lit.into())
        } else if self.eat("Recursion(") {
            let inner = self.exp()?;
            self.expect(")")?;
            Ok(Exp::Recursion(Recursion { inner: Box::new(inner) }))
        } else {
            Err(self.error("an expression"))
        }
    }

    fn pattern(&mut self) -> Result<Pattern, ReprError> {
        if self.eat("WildCard") {
            Ok(Pattern::WildCard)
        } else if self.eat("Literal(") {
            let lit = self.lit()?;
            self.expect(")")?;
            Ok(Pattern::Literal(lit))
        } else if self.eat("Var(") {
            let name = self.usize()?;
            self.expect(")")?;
            Ok(Pattern::Var(name))
        } else if self.eat("Named(") {
            let name = self.usize()?;
            self.expect(",")?;
            let pattern = self.pattern()?;
            self.expect(")")?;
            Ok(Pattern::Named { name, pattern: Box::new(pattern) })
        } else if self.eat("ListPat(") {
            let mut parts = Vec::new();
            if !self.eat(")") {
                loop {
                    parts.push(self.list_part()?);
                    if self.eat(",") {
                        continue;
                    }
                    self.expect(")")?;
                    break;
                }
            }
            Ok(Pattern::list(parts)?)
        } else if self.eat("PositionalStruct(") {
            let tag = self.opt_usize()?;
            let mut params = Vec::new();
            while self.eat(",") {
                params.push(self.pattern()?);
            }
            self.expect(")")?;
            Ok(Pattern::Struct { tag, params, family: DataFamily::Enum })
        } else if self.eat("Union(") {
            let head = self.pattern()?;
            self.expect(",")?;
            let mut rest = vec![self.pattern()?];
            while self.eat(",") {
                rest.push(self.pattern()?);
            }
            self.expect(")")?;
            Ok(Pattern::union(head, rest)?)
        } else if self.eat("StrPat(") {
            let mut parts = vec![self.str_part()?];
            while self.eat(",") {
                parts.push(self.str_part()?);
            }
            self.expect(")")?;
            Ok(Pattern::str(parts)?)
        } else {
            Err(self.error("a pattern"))
        }
    }

    fn list_part(&mut self) -> Result<ListPart, ReprError> {
        if self.eat("Left(") {
            let opt = self.opt_usize()?;
            self.expect(")")?;
            Ok(ListPart::Splice(opt))
        } else if self.eat("Right(") {
            let pattern = self.pattern()?;
            self.expect(")")?;
            Ok(ListPart::Item(pattern))
        } else {
            Err(self.error("Left(..) or Right(..)"))
        }
    }

    fn str_part(&mut self) -> Result<StrPart, ReprError> {
        if self.eat("WildStr") {
            Ok(StrPart::WildStr)
        } else if self.eat("NamedStr(") {
            let name = self.usize()?;
            self.expect(")")?;
            Ok(StrPart::NamedStr(name))
        } else if self.eat("LitStr(") {
            let s = self.quoted()?;
            self.expect(")")?;
            Ok(StrPart::LitStr(s))
        } else {
            Err(self.error("a string pattern part"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_exp(exp: &Exp) {
        let encoded = exp.repr();
        let decoded = parse_exp(&encoded).unwrap();
        assert_eq!(&decoded, exp, "through {encoded}");
    }

    fn roundtrip_pattern(pattern: &Pattern) {
        let encoded = pattern.repr();
        let decoded = parse_pattern(&encoded).unwrap();
        assert_eq!(&decoded, pattern, "through {encoded}");
    }

    #[test]
    fn exp_roundtrips() {
        let external = Exp::ExternalVar(ExternalVar {
            pack: PackageName::from_string("Core/Num"),
            name: Ident::from_string("add"),
            typ: TypeRef::from_string("Int -> Int -> Int"),
        });
        roundtrip_exp(&Exp::app(
            Exp::lambda(Exp::app(external.clone(), Exp::var(0))),
            Exp::int(-42),
        ));
        roundtrip_exp(&Exp::Recursion(Recursion {
            inner: Box::new(Exp::lambda(Exp::cons(Exp::str("x"), Exp::var(0)))),
        }));
        roundtrip_exp(&Exp::Match(Match {
            on_exp: Box::new(Exp::var(1)),
            cases: vec![
                Case {
                    pattern: Pattern::Struct {
                        tag: Some(1),
                        params: vec![Pattern::Var(0)],
                        family: DataFamily::Enum,
                    },
                    body: Exp::lambda(Exp::var(0)),
                },
                Case { pattern: Pattern::WildCard, body: Exp::int(0) },
            ],
        }));
    }

    #[test]
    fn pattern_roundtrips() {
        roundtrip_pattern(&Pattern::WildCard);
        roundtrip_pattern(
            &Pattern::list(vec![
                ListPart::Item(Pattern::Literal(Lit::int(1))),
                ListPart::Splice(Some(0)),
            ])
            .unwrap(),
        );
        roundtrip_pattern(&Pattern::list(vec![]).unwrap());
        roundtrip_pattern(
            &Pattern::union(
                Pattern::Named { name: 0, pattern: Box::new(Pattern::WildCard) },
                vec![Pattern::Var(0)],
            )
            .unwrap(),
        );
        roundtrip_pattern(
            &Pattern::str(vec![
                StrPart::LitStr("pre".to_owned()),
                StrPart::NamedStr(0),
                StrPart::WildStr,
            ])
            .unwrap(),
        );
    }

    #[test]
    fn strings_escape_quotes_and_backslashes() {
        let exp = Exp::str("it's a \\ test");
        let encoded = exp.repr();
        assert_eq!(encoded, r"Literal('it\'s a \\ test')");
        assert_eq!(parse_exp(&encoded).unwrap(), exp);
    }

    #[test]
    fn trailing_input_is_rejected() {
        let err = parse_exp("LambdaVar(0))").unwrap_err();
        assert!(matches!(err, ReprError::Trailing { .. }));
    }

    #[test]
    fn two_splices_fail_to_parse() {
        let err = parse_pattern("ListPat(Left(None),Left(None))").unwrap_err();
        assert!(matches!(
            err,
            ReprError::InvalidPattern(InvalidPattern::MultipleSplices)
        ));
    }
}
