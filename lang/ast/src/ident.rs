use std::fmt;

// Identifiers
//
//

/// The name of a local variable, top-level binding, or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ident {
    pub id: String,
}

impl Ident {
    pub fn from_string(id: &str) -> Self {
        Ident { id: id.to_owned() }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

// Package names
//
//

/// The name of a package, e.g. `Core/List`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName {
    pub id: String,
}

impl PackageName {
    pub fn from_string(id: &str) -> Self {
        PackageName { id: id.to_owned() }
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

// Type references
//
//

/// The rendered type of an external definition.
///
/// The middle-end does not interpret types; it only carries them through to
/// the backend so that external references stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef {
    pub id: String,
}

impl TypeRef {
    pub fn from_string(id: &str) -> Self {
        TypeRef { id: id.to_owned() }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
