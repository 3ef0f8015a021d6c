use pretty::DocAllocator;

/// Semantic annotations emitted by the prettyprinter.
///
/// The plain-text renderer ignores them; colored backends map them
/// to terminal styles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anno {
    Keyword,
    Ctor,
    Lit,
    Comment,
}

pub type Alloc<'a> = pretty::Arena<'a, Anno>;
pub type Builder<'a> = pretty::DocBuilder<'a, Alloc<'a>, Anno>;

#[derive(Debug, Clone)]
pub struct PrintCfg {
    pub width: usize,
    /// Indentation size for nested blocks.
    pub indent: isize,
}

impl Default for PrintCfg {
    fn default() -> Self {
        PrintCfg { width: crate::DEFAULT_WIDTH, indent: 4 }
    }
}

pub trait Print {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a>;

    fn print_to_string(&self, cfg: Option<&PrintCfg>) -> String {
        let alloc = Alloc::new();
        let mut buf = Vec::new();
        let def = PrintCfg::default();
        let cfg = cfg.unwrap_or(&def);
        self.print(cfg, &alloc)
            .1
            .render(cfg.width, &mut buf)
            .expect("Failed to render document to string");
        String::from_utf8(buf).expect("Prettyprinter produced invalid UTF-8")
    }
}

impl<T: Print> Print for Box<T> {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        (**self).print(cfg, alloc)
    }
}

impl<T: Print> Print for &T {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        (**self).print(cfg, alloc)
    }
}

/// Print an iterable comma-separated.
pub fn print_comma_separated<'a, T: Print>(
    items: &'a [T],
    cfg: &PrintCfg,
    alloc: &'a Alloc<'a>,
) -> Builder<'a> {
    let sep = alloc.text(crate::tokens::COMMA).append(alloc.space());
    alloc.intersperse(items.iter().map(|item| item.print(cfg, alloc)), sep)
}
