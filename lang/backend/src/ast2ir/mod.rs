mod ctors;
mod ctx;
mod decls;
mod exprs;
mod pats;

pub use ctors::*;
pub use ctx::*;
pub use decls::*;
pub use exprs::*;
pub use pats::*;
