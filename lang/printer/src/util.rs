pub trait ParensExt<'a, D, A: 'a>
where
    D: ?Sized + pretty::DocAllocator<'a, A>,
{
    /// Wrap in parentheses only when `needed` holds.
    fn opt_parens(self, needed: bool) -> pretty::DocBuilder<'a, D, A>;
}

impl<'a, D, A> ParensExt<'a, D, A> for pretty::DocBuilder<'a, D, A>
where
    D: ?Sized + pretty::DocAllocator<'a, A>,
{
    fn opt_parens(self, needed: bool) -> pretty::DocBuilder<'a, D, A> {
        if needed { self.parens() } else { self }
    }
}
