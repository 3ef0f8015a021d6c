mod decls;
mod exp;
mod ident;
mod lit;
mod pat;

pub use decls::*;
pub use exp::*;
pub use ident::*;
pub use lit::*;
pub use pat::*;

pub type HashMap<K, V> = fxhash::FxHashMap<K, V>;
pub type HashSet<V> = fxhash::FxHashSet<V>;
