#![deny(missing_docs)]

//! # Type Expressions
//!
//! Parses a Rust type string (e.g. `Option<Vec<Todo>>`) into a small tree
//! that the model catalog maps onto descriptors.

use crate::error::{AppError, AppResult};
use ra_ap_edition::Edition;
use ra_ap_syntax::ast::{self, HasGenericArgs};
use ra_ap_syntax::{AstNode, SourceFile};

/// The structural parts of a Rust type that matter for documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A path type. `name` is the last segment, `args` its type arguments.
    Named {
        /// Last path segment (`chrono::DateTime` -> `DateTime`).
        name: String,
        /// Type arguments in order. Lifetimes and consts are dropped.
        args: Vec<TypeExpr>,
    },
    /// `&T` or `&mut T`.
    Reference(Box<TypeExpr>),
    /// `[T]` or `[T; N]`.
    Slice(Box<TypeExpr>),
    /// Anything else (tuples, fn pointers, trait objects), as written.
    Other(String),
}

/// Parses a type string.
pub fn parse_type(rust_type: &str) -> AppResult<TypeExpr> {
    // Wrap in a type alias so the string parses as valid Rust
    let code = format!("type _Wrapper = {};", rust_type);
    let parse = SourceFile::parse(&code, Edition::Edition2021);
    let file = parse.tree();

    let root_type = file
        .syntax()
        .descendants()
        .find_map(ast::TypeAlias::cast)
        .and_then(|alias| alias.ty())
        .ok_or_else(|| AppError::General(format!("Failed to parse type string: {}", rust_type)))?;

    map_ast_type(&root_type)
}

fn map_ast_type(ty: &ast::Type) -> AppResult<TypeExpr> {
    match ty {
        ast::Type::PathType(path_type) => {
            let segment = path_type
                .path()
                .and_then(|path| path.segment())
                .ok_or_else(|| AppError::General("Empty path".into()))?;
            let name = segment
                .name_ref()
                .ok_or_else(|| AppError::General("No type name".into()))?
                .text()
                .to_string();

            let args = match segment.generic_arg_list() {
                Some(list) => list
                    .generic_args()
                    .filter_map(|arg| match arg {
                        ast::GenericArg::TypeArg(type_arg) => type_arg.ty(),
                        _ => None,
                    })
                    .map(|inner| map_ast_type(&inner))
                    .collect::<AppResult<Vec<_>>>()?,
                None => Vec::new(),
            };

            Ok(TypeExpr::Named { name, args })
        }
        ast::Type::RefType(ref_type) => {
            let inner = ref_type
                .ty()
                .ok_or_else(|| AppError::General("Invalid reference".into()))?;
            Ok(TypeExpr::Reference(Box::new(map_ast_type(&inner)?)))
        }
        ast::Type::SliceType(slice) => {
            let inner = slice
                .ty()
                .ok_or_else(|| AppError::General("Invalid slice".into()))?;
            Ok(TypeExpr::Slice(Box::new(map_ast_type(&inner)?)))
        }
        ast::Type::ArrayType(array) => {
            let inner = array
                .ty()
                .ok_or_else(|| AppError::General("Invalid array".into()))?;
            Ok(TypeExpr::Slice(Box::new(map_ast_type(&inner)?)))
        }
        ast::Type::ParenType(paren) => {
            let inner = paren
                .ty()
                .ok_or_else(|| AppError::General("Invalid parenthesized type".into()))?;
            map_ast_type(&inner)
        }
        other => Ok(TypeExpr::Other(other.syntax().text().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, args: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::Named {
            name: name.into(),
            args,
        }
    }

    #[test]
    fn test_primitive() {
        assert_eq!(parse_type("i32").unwrap(), named("i32", vec![]));
    }

    #[test]
    fn test_nested_generics() {
        assert_eq!(
            parse_type("Option<Vec<models::Todo>>").unwrap(),
            named("Option", vec![named("Vec", vec![named("Todo", vec![])])])
        );
    }

    #[test]
    fn test_references_and_slices() {
        assert_eq!(
            parse_type("&'a [u8]").unwrap(),
            TypeExpr::Reference(Box::new(TypeExpr::Slice(Box::new(named("u8", vec![])))))
        );
        assert_eq!(
            parse_type("[String; 4]").unwrap(),
            TypeExpr::Slice(Box::new(named("String", vec![])))
        );
    }

    #[test]
    fn test_lifetimes_are_dropped() {
        assert_eq!(
            parse_type("Cow<'static, str>").unwrap(),
            named("Cow", vec![named("str", vec![])])
        );
    }

    #[test]
    fn test_other_types() {
        assert_eq!(
            parse_type("(i32, String)").unwrap(),
            TypeExpr::Other("(i32, String)".into())
        );
    }
}
