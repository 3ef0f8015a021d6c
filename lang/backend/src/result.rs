use miette::Diagnostic;
use thiserror::Error;

use ast::LookupError;
use ir::IrError;

#[derive(Error, Diagnostic, Debug)]
pub enum BackendError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Ir(#[from] IrError),
    #[error("No case of this match applies to {scrutinee}")]
    #[diagnostic(
        code("B-001"),
        help("Every value the scrutinee can take must be covered by some case")
    )]
    NonExhaustiveMatch { scrutinee: String },
    #[error("An unexpected internal error occurred: {message}")]
    #[diagnostic(code("B-XXX"))]
    /// This error should not occur.
    /// Some internal invariant has been violated.
    Impossible { message: String },
}
