mod free_vars;
mod shift;
mod subst;

pub use free_vars::*;
pub use shift::*;
pub use subst::*;
