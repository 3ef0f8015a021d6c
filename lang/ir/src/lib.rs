mod exp;
mod matcher;
mod normalize;
mod pattern;
mod print;
mod repr;
mod result;
mod traits;

pub use exp::*;
pub use matcher::*;
pub use normalize::*;
pub use pattern::*;
pub use repr::*;
pub use result::*;
pub use traits::*;
