use miette::Diagnostic;
use thiserror::Error;

use crate::exp::Exp;
use crate::ident::{Ident, PackageName, TypeRef};
use crate::HashMap;

// Data families
//
//

/// How a data type's values are laid out.
///
/// This is an advisory marker for downstream consumers (a code generator may
/// unbox `Struct` values or represent `Nat` as a machine integer); it does
/// not influence how terms reduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFamily {
    /// A data type with more than one constructor.
    Enum,
    /// A data type with exactly one constructor.
    Struct,
    /// A data type shaped like the natural numbers: one nullary and one
    /// unary constructor.
    Nat,
}

// Data declarations
//
//

/// A single constructor of a data type, with the number of fields it takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ctor {
    pub name: Ident,
    pub arity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDecl {
    pub name: Ident,
    pub family: DataFamily,
    /// Constructors in declaration order; a constructor's position is its tag.
    pub ctors: Vec<Ctor>,
}

impl DataDecl {
    pub fn ctor_index(&self, name: &Ident) -> Option<usize> {
        self.ctors.iter().position(|ctor| &ctor.name == name)
    }
}

// Let bindings
//
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionKind {
    Recursive,
    NonRecursive,
}

impl RecursionKind {
    pub fn is_recursive(self) -> bool {
        matches!(self, RecursionKind::Recursive)
    }
}

/// A top-level let binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetDecl {
    pub name: Ident,
    pub rec: RecursionKind,
    pub body: Exp,
}

// External definitions
//
//

/// A definition whose implementation is provided by the runtime rather than
/// by an expression in this package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDecl {
    pub name: Ident,
    pub typ: TypeRef,
}

// Imports
//
//

/// An import of names from another package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub from: PackageName,
    pub names: Vec<Ident>,
}

// Packages
//
//

/// A type-checked, name-resolved package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: PackageName,
    pub imports: Vec<Import>,
    pub data_decls: Vec<DataDecl>,
    pub externals: Vec<ExternalDecl>,
    /// Top-level bindings in declaration order. A binding may refer to any
    /// binding declared before it, and to itself if marked recursive.
    pub lets: Vec<LetDecl>,
}

impl Package {
    pub fn lookup_let(&self, name: &Ident) -> Option<&LetDecl> {
        self.lets.iter().find(|decl| &decl.name == name)
    }

    /// Find the data type declaring `ctor`, together with the constructor's tag.
    pub fn lookup_ctor(&self, ctor: &Ident) -> Option<(&DataDecl, usize)> {
        self.data_decls
            .iter()
            .find_map(|decl| decl.ctor_index(ctor).map(|idx| (decl, idx)))
    }

    pub fn lookup_external(&self, name: &Ident) -> Option<&ExternalDecl> {
        self.externals.iter().find(|decl| &decl.name == name)
    }

    /// Whether this package imports `name` from `from`.
    pub fn imports_name(&self, from: &PackageName, name: &Ident) -> bool {
        self.imports
            .iter()
            .any(|import| &import.from == from && import.names.contains(name))
    }
}

// Package maps
//
//

/// All packages of a compilation, keyed by name.
///
/// Declaration order of the packages is preserved; within a package, let
/// bindings are processed in declaration order.
#[derive(Debug, Clone)]
pub struct PackageMap {
    packages: Vec<Package>,
    index: HashMap<PackageName, usize>,
}

impl PackageMap {
    pub fn new(packages: Vec<Package>) -> Self {
        let index = packages
            .iter()
            .enumerate()
            .map(|(idx, pack)| (pack.name.clone(), idx))
            .collect();
        PackageMap { packages, index }
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    pub fn lookup(&self, name: &PackageName) -> Result<&Package, LookupError> {
        self.index
            .get(name)
            .map(|idx| &self.packages[*idx])
            .ok_or_else(|| LookupError::UndefinedPackage { name: name.to_string() })
    }

    pub fn lookup_ctor(
        &self,
        pack: &PackageName,
        ctor: &Ident,
    ) -> Result<(&DataDecl, usize), LookupError> {
        self.lookup(pack)?.lookup_ctor(ctor).ok_or_else(|| LookupError::UndefinedConstructor {
            pack: pack.to_string(),
            name: ctor.to_string(),
        })
    }
}

// Lookup errors
//
//

#[derive(Error, Diagnostic, Debug)]
pub enum LookupError {
    #[error("Undefined package {name}")]
    #[diagnostic(code("L-001"))]
    UndefinedPackage { name: String },
    #[error("Undefined constructor {pack}::{name}")]
    #[diagnostic(code("L-002"))]
    UndefinedConstructor { pack: String, name: String },
    #[error("Undefined top-level binding {pack}::{name}")]
    #[diagnostic(code("L-003"))]
    UndefinedLet { pack: String, name: String },
    #[error("Undefined variable {name}")]
    #[diagnostic(code("L-004"))]
    UndefinedVariable { name: String },
    #[error("{pack}::{name} is not imported here")]
    #[diagnostic(code("L-005"))]
    NotImported { pack: String, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_decl() -> DataDecl {
        DataDecl {
            name: Ident::from_string("List"),
            family: DataFamily::Enum,
            ctors: vec![
                Ctor { name: Ident::from_string("Nil"), arity: 0 },
                Ctor { name: Ident::from_string("Cons"), arity: 2 },
            ],
        }
    }

    #[test]
    fn ctor_index_is_declaration_order() {
        let decl = list_decl();
        assert_eq!(decl.ctor_index(&Ident::from_string("Nil")), Some(0));
        assert_eq!(decl.ctor_index(&Ident::from_string("Cons")), Some(1));
        assert_eq!(decl.ctor_index(&Ident::from_string("Snoc")), None);
    }

    #[test]
    fn lookup_ctor_reports_unknown_package() {
        let map = PackageMap::new(vec![]);
        let err = map
            .lookup_ctor(&PackageName::from_string("Core/List"), &Ident::from_string("Nil"))
            .unwrap_err();
        assert!(matches!(err, LookupError::UndefinedPackage { .. }));
    }
}
