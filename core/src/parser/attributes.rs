//! # Attribute Operations
//!
//! internal logic for parsing `#[serde(...)]` and validation attributes.

use crate::descriptor::FieldRules;
use crate::parser::models::RenameRule;
use ra_ap_syntax::ast::{self};
use ra_ap_syntax::{AstNode, SyntaxNode};
use regex::Regex;
use std::sync::OnceLock;

/// Helper struct for attributes extracted from a single node.
#[derive(Default, Debug)]
pub struct AttrInfo {
    /// The rename value if present.
    pub rename: Option<String>,
    /// Whether a skip flag was found.
    pub is_skipped: bool,
    /// The rename_all convention (for structs) if present.
    pub rename_all: Option<RenameRule>,
    /// Validation rules.
    pub rules: FieldRules,
}

/// Analyzes attributes on a node to find `serde` and validation configurations.
pub fn extract_attributes(node: &SyntaxNode) -> AttrInfo {
    let mut info = AttrInfo::default();

    for attr in node.children().filter_map(ast::Attr::cast) {
        let Some(meta) = attr.meta() else {
            continue;
        };
        let (Some(path), Some(tt)) = (meta.path(), meta.token_tree()) else {
            continue;
        };

        let content = tt.to_string();
        match path.to_string().as_str() {
            "serde" => parse_serde_content(&content, &mut info),
            "validate" | "garde" => info.rules.merge(parse_validation_content(&content)),
            "doc_rules" => {
                if let Some(rules) = string_literal(&content) {
                    info.rules.merge(FieldRules::parse(rules));
                }
            }
            _ => {}
        }
    }

    info
}

/// Parses the inner content of a serde attribute.
fn parse_serde_content(content: &str, info: &mut AttrInfo) {
    static RENAME_RE: OnceLock<Regex> = OnceLock::new();
    let rename_re =
        RENAME_RE.get_or_init(|| Regex::new(r#"\brename\s*=\s*"([^"]+)""#).expect("Invalid regex"));

    static RENAME_ALL_RE: OnceLock<Regex> = OnceLock::new();
    let rename_all_re = RENAME_ALL_RE
        .get_or_init(|| Regex::new(r#"\brename_all\s*=\s*"([^"]+)""#).expect("Invalid regex"));

    static SKIP_RE: OnceLock<Regex> = OnceLock::new();
    let skip_re = SKIP_RE
        .get_or_init(|| Regex::new(r#"\b(skip|skip_serializing)\b"#).expect("Invalid regex"));

    if let Some(val) = rename_re.captures(content).and_then(|caps| caps.get(1)) {
        info.rename = Some(val.as_str().to_string());
    }

    if let Some(val) = rename_all_re.captures(content).and_then(|caps| caps.get(1)) {
        match val.as_str().parse() {
            Ok(rule) => info.rename_all = Some(rule),
            Err(()) => tracing::warn!(rule = val.as_str(), "ignoring unknown rename_all rule"),
        }
    }

    if skip_re.is_match(content) {
        info.is_skipped = true;
    }
}

/// Parses `validator`/`garde` style rules.
///
/// `min`/`max` are read wherever they appear, so `length(min = 1)` and
/// `range(min = 0)` both set the lower bound.
fn parse_validation_content(content: &str) -> FieldRules {
    static REQUIRED_RE: OnceLock<Regex> = OnceLock::new();
    let required_re =
        REQUIRED_RE.get_or_init(|| Regex::new(r#"\brequired\b"#).expect("Invalid regex"));

    static MIN_RE: OnceLock<Regex> = OnceLock::new();
    let min_re = MIN_RE.get_or_init(|| Regex::new(r#"\bmin\s*=\s*(-?\d+)"#).expect("Invalid regex"));

    static MAX_RE: OnceLock<Regex> = OnceLock::new();
    let max_re = MAX_RE.get_or_init(|| Regex::new(r#"\bmax\s*=\s*(-?\d+)"#).expect("Invalid regex"));

    let bound = |re: &Regex| {
        re.captures(content)
            .and_then(|caps| caps.get(1))
            .and_then(|val| val.as_str().parse().ok())
    };

    FieldRules {
        required: required_re.is_match(content),
        min: bound(min_re),
        max: bound(max_re),
        ..FieldRules::default()
    }
}

fn string_literal(content: &str) -> Option<&str> {
    static LITERAL_RE: OnceLock<Regex> = OnceLock::new();
    let literal_re =
        LITERAL_RE.get_or_init(|| Regex::new(r#""([^"]*)""#).expect("Invalid regex"));

    literal_re
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|val| val.as_str())
}
