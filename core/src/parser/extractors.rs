//! # Extraction Logic
//!
//! High-level functions to parse Rust code into IR models.

use crate::error::{AppError, AppResult};
use crate::parser::attributes::extract_attributes;
use crate::parser::models::{ParsedField, ParsedStruct};
use ra_ap_edition::Edition;
use ra_ap_syntax::ast::{self, HasName, HasVisibility};
use ra_ap_syntax::{AstNode, SourceFile, SyntaxKind, SyntaxNode};

/// Extracts every struct with named fields, in source order.
///
/// Tuple and unit structs have no members to document and are skipped.
pub fn extract_models(code: &str) -> AppResult<Vec<ParsedStruct>> {
    let parse = SourceFile::parse(code, Edition::Edition2021);
    let file = parse.tree();

    let models: Vec<ParsedStruct> = file
        .syntax()
        .descendants()
        .filter_map(ast::Struct::cast)
        .filter_map(parse_struct_node)
        .collect();

    tracing::debug!(count = models.len(), "extracted models");
    Ok(models)
}

/// Extracts the names of all structs defined in the provided Rust source code.
pub fn extract_struct_names(code: &str) -> AppResult<Vec<String>> {
    Ok(extract_models(code)?.into_iter().map(|s| s.name).collect())
}

/// Parses a Rust source file to extract one struct definition.
pub fn extract_struct(code: &str, struct_name: &str) -> AppResult<ParsedStruct> {
    extract_models(code)?
        .into_iter()
        .find(|s| s.name == struct_name)
        .ok_or_else(|| AppError::General(format!("Struct '{}' not found", struct_name)))
}

fn parse_struct_node(struct_def: ast::Struct) -> Option<ParsedStruct> {
    let name = struct_def.name()?.text().to_string();
    let ast::FieldList::RecordFieldList(list) = struct_def.field_list()? else {
        return None;
    };

    let struct_attrs = extract_attributes(struct_def.syntax());
    let fields = list
        .fields()
        .filter_map(|field| {
            let (fname, ty) = (field.name()?, field.ty()?);
            let attrs = extract_attributes(field.syntax());
            Some(ParsedField {
                name: fname.text().to_string(),
                ty: ty.syntax().text().to_string(),
                description: extract_doc_comment(field.syntax()),
                rename: attrs.rename,
                is_skipped: attrs.is_skipped,
                is_public: is_bare_pub(field.visibility()),
                rules: attrs.rules,
            })
        })
        .collect();

    Some(ParsedStruct {
        name,
        description: extract_doc_comment(struct_def.syntax()),
        rename_all: struct_attrs.rename_all,
        fields,
    })
}

/// `pub(crate)` and friends are not visible outside the crate.
fn is_bare_pub(visibility: Option<ast::Visibility>) -> bool {
    visibility.is_some_and(|vis| vis.syntax().text() == "pub")
}

/// Helper to extract `///` comments from a syntax node's trivia children.
pub(crate) fn extract_doc_comment(node: &SyntaxNode) -> Option<String> {
    let mut lines = Vec::new();

    for child in node.children_with_tokens() {
        if child.kind() == SyntaxKind::COMMENT {
            let text = child.to_string();
            if let Some(content) = text.strip_prefix("///") {
                lines.push(content.strip_prefix(' ').unwrap_or(content).to_owned());
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n").trim().to_string())
    }
}
