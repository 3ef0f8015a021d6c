use pretty::DocAllocator;

use super::types::*;

pub trait ThemeExt<'a> {
    fn keyword(&'a self, text: &str) -> Builder<'a>;
    fn ctor(&'a self, text: &str) -> Builder<'a>;
    fn lit(&'a self, text: String) -> Builder<'a>;
    fn comment(&'a self, text: &str) -> Builder<'a>;
}

impl<'a> ThemeExt<'a> for Alloc<'a> {
    fn keyword(&'a self, text: &str) -> Builder<'a> {
        self.text(text.to_owned()).annotate(Anno::Keyword)
    }

    fn ctor(&'a self, text: &str) -> Builder<'a> {
        self.text(text.to_owned()).annotate(Anno::Ctor)
    }

    fn lit(&'a self, text: String) -> Builder<'a> {
        self.text(text).annotate(Anno::Lit)
    }

    fn comment(&'a self, text: &str) -> Builder<'a> {
        self.text(text.to_owned()).annotate(Anno::Comment)
    }
}
