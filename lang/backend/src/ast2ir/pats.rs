use ast::{DataFamily, Ident, PackageMap};
use ir::IrError;

use crate::result::BackendError;

/// Replace the names of a surface pattern by dense slot indices and resolve
/// constructor references to tags.
///
/// `names` is the pattern's own name list in first-occurrence order, so the
/// produced slots are exactly `0..names.len()`.
pub fn convert_pattern(
    map: &PackageMap,
    names: &[Ident],
    pattern: &ast::Pattern,
) -> Result<ir::Pattern, BackendError> {
    let converted = match pattern {
        ast::Pattern::WildCard => ir::Pattern::WildCard,
        ast::Pattern::Literal(lit) => ir::Pattern::Literal(lit.clone()),
        ast::Pattern::Var(name) => ir::Pattern::Var(slot(names, name)?),
        ast::Pattern::Named { name, pattern } => ir::Pattern::Named {
            name: slot(names, name)?,
            pattern: Box::new(convert_pattern(map, names, pattern)?),
        },
        ast::Pattern::List(parts) => {
            let parts = parts
                .iter()
                .map(|part| {
                    Ok(match part {
                        ast::ListPart::Splice(None) => ir::ListPart::Splice(None),
                        ast::ListPart::Splice(Some(name)) => {
                            ir::ListPart::Splice(Some(slot(names, name)?))
                        }
                        ast::ListPart::Item(pattern) => {
                            ir::ListPart::Item(convert_pattern(map, names, pattern)?)
                        }
                    })
                })
                .collect::<Result<Vec<_>, BackendError>>()?;
            ir::Pattern::list(parts).map_err(IrError::from)?
        }
        ast::Pattern::Struct { pack, ctor, params } => {
            let (data, idx) = map.lookup_ctor(pack, ctor)?;
            // A single-constructor type needs no tag check at match time.
            let tag = match data.family {
                DataFamily::Struct => None,
                DataFamily::Enum | DataFamily::Nat => Some(idx),
            };
            let params = params
                .iter()
                .map(|param| convert_pattern(map, names, param))
                .collect::<Result<Vec<_>, _>>()?;
            ir::Pattern::Struct { tag, params, family: data.family }
        }
        ast::Pattern::Union { head, rest } => {
            let head = convert_pattern(map, names, head)?;
            let rest = rest
                .iter()
                .map(|pat| convert_pattern(map, names, pat))
                .collect::<Result<Vec<_>, _>>()?;
            ir::Pattern::union(head, rest).map_err(IrError::from)?
        }
        ast::Pattern::Str(parts) => {
            let parts = parts
                .iter()
                .map(|part| {
                    Ok(match part {
                        ast::StrPart::WildStr => ir::StrPart::WildStr,
                        ast::StrPart::NamedStr(name) => ir::StrPart::NamedStr(slot(names, name)?),
                        ast::StrPart::LitStr(s) => ir::StrPart::LitStr(s.clone()),
                    })
                })
                .collect::<Result<Vec<_>, BackendError>>()?;
            ir::Pattern::str(parts).map_err(IrError::from)?
        }
    };
    Ok(converted)
}

fn slot(names: &[Ident], name: &Ident) -> Result<usize, BackendError> {
    names.iter().position(|n| n == name).ok_or_else(|| BackendError::Impossible {
        message: format!("pattern name {name} is missing from its own name list"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::{Ctor, DataDecl, Package, PackageName};

    fn map_with_list() -> PackageMap {
        PackageMap::new(vec![Package {
            name: PackageName::from_string("Core/List"),
            imports: vec![],
            data_decls: vec![DataDecl {
                name: Ident::from_string("List"),
                family: DataFamily::Enum,
                ctors: vec![
                    Ctor { name: Ident::from_string("Nil"), arity: 0 },
                    Ctor { name: Ident::from_string("Cons"), arity: 2 },
                ],
            }],
            externals: vec![],
            lets: vec![],
        }])
    }

    #[test]
    fn names_become_dense_slots() {
        let map = map_with_list();
        let pattern = ast::Pattern::Struct {
            pack: PackageName::from_string("Core/List"),
            ctor: Ident::from_string("Cons"),
            params: vec![
                ast::Pattern::Var(Ident::from_string("head")),
                ast::Pattern::Var(Ident::from_string("tail")),
            ],
        };
        let names = pattern.names();
        let converted = convert_pattern(&map, &names, &pattern).unwrap();
        assert_eq!(
            converted,
            ir::Pattern::Struct {
                tag: Some(1),
                params: vec![ir::Pattern::Var(0), ir::Pattern::Var(1)],
                family: DataFamily::Enum,
            }
        );
        assert_eq!(converted.var_count(), 2);
    }

    #[test]
    fn unknown_constructors_are_reported() {
        let map = map_with_list();
        let pattern = ast::Pattern::Struct {
            pack: PackageName::from_string("Core/List"),
            ctor: Ident::from_string("Snoc"),
            params: vec![],
        };
        let err = convert_pattern(&map, &[], &pattern).unwrap_err();
        assert!(matches!(err, BackendError::Lookup(_)));
    }
}
