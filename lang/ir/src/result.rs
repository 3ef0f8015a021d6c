use miette::Diagnostic;
use thiserror::Error;

/// Construction-time validation failures for patterns. These indicate a bug
/// in whatever produced the pattern, so they are raised eagerly instead of
/// surfacing as strange match results later.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum InvalidPattern {
    #[error("A list pattern may contain at most one splice")]
    #[diagnostic(code("P-001"))]
    MultipleSplices,
    #[error("A union pattern needs at least two alternatives")]
    #[diagnostic(code("P-002"))]
    EmptyUnion,
    #[error("A string pattern needs at least one part")]
    #[diagnostic(code("P-003"))]
    EmptyStrPat,
}

#[derive(Error, Diagnostic, Debug)]
pub enum IrError {
    #[error("Rewriting did not reach a normal form within {budget} steps")]
    #[diagnostic(
        code("N-001"),
        help("The reduction budget can be raised if the term is expected to be this large")
    )]
    RewriteBudgetExceeded { budget: usize },
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidPattern(#[from] InvalidPattern),
}
