use num_bigint::BigInt;

use printer::theme::ThemeExt;
use printer::{Alloc, Builder, Print, PrintCfg};

/// A literal value.
///
/// Integer literals are arbitrary-precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lit {
    Int(BigInt),
    Str(String),
}

impl Lit {
    pub fn int(i: i64) -> Self {
        Lit::Int(BigInt::from(i))
    }

    pub fn str(s: &str) -> Self {
        Lit::Str(s.to_owned())
    }
}

impl Print for Lit {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Lit::Int(i) => alloc.lit(i.to_string()),
            Lit::Str(s) => alloc.lit(format!("{s:?}")),
        }
    }
}
