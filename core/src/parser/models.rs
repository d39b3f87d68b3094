//! # Data Models
//!
//! Structures extracted from Rust source, before they become descriptors.

use crate::descriptor::FieldRules;
use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use std::str::FromStr;

/// A `#[serde(rename_all = "...")]` convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    /// `lowercase`
    Lower,
    /// `UPPERCASE`
    Upper,
    /// `PascalCase`
    Pascal,
    /// `camelCase`
    Camel,
    /// `snake_case`
    Snake,
    /// `SCREAMING_SNAKE_CASE`
    ScreamingSnake,
    /// `kebab-case`
    Kebab,
    /// `SCREAMING-KEBAB-CASE`
    ScreamingKebab,
}

impl RenameRule {
    /// Applies the convention to a field name.
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::Lower => name.to_lowercase(),
            Self::Upper => name.to_uppercase(),
            Self::Pascal => name.to_upper_camel_case(),
            Self::Camel => name.to_lower_camel_case(),
            Self::Snake => name.to_snake_case(),
            Self::ScreamingSnake => name.to_shouty_snake_case(),
            Self::Kebab => name.to_kebab_case(),
            Self::ScreamingKebab => name.to_shouty_kebab_case(),
        }
    }
}

impl FromStr for RenameRule {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "PascalCase" => Ok(Self::Pascal),
            "camelCase" => Ok(Self::Camel),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            "SCREAMING-KEBAB-CASE" => Ok(Self::ScreamingKebab),
            _ => Err(()),
        }
    }
}

/// A named field of a parsed struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedField {
    /// The name of the field.
    pub name: String,
    /// The raw Rust type string.
    pub ty: String,
    /// Extracted doc comments (if any).
    pub description: Option<String>,
    /// `#[serde(rename = "...")]`.
    pub rename: Option<String>,
    /// `#[serde(skip)]` or `#[serde(skip_serializing)]`.
    pub is_skipped: bool,
    /// Declared with a bare `pub`.
    pub is_public: bool,
    /// Validation rules from `validate`, `garde` or `doc_rules` attributes.
    pub rules: FieldRules,
}

impl ParsedField {
    /// The name this field is serialized under.
    pub fn serialized_name(&self, rename_all: Option<RenameRule>) -> String {
        match (&self.rename, rename_all) {
            (Some(rename), _) => rename.clone(),
            (None, Some(rule)) => rule.apply(&self.name),
            (None, None) => self.name.clone(),
        }
    }
}

/// A struct with named fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStruct {
    /// The struct name.
    pub name: String,
    /// The struct-level description from doc comments.
    pub description: Option<String>,
    /// `#[serde(rename_all = "...")]`.
    pub rename_all: Option<RenameRule>,
    /// The list of fields.
    pub fields: Vec<ParsedField>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> ParsedField {
        ParsedField {
            name: name.into(),
            ty: "String".into(),
            description: None,
            rename: None,
            is_skipped: false,
            is_public: true,
            rules: FieldRules::default(),
        }
    }

    #[test]
    fn test_rename_rules() {
        let cases = [
            ("camelCase", "createdAt"),
            ("PascalCase", "CreatedAt"),
            ("kebab-case", "created-at"),
            ("SCREAMING_SNAKE_CASE", "CREATED_AT"),
            ("lowercase", "created_at"),
            ("UPPERCASE", "CREATED_AT"),
        ];
        for (rule, expected) in cases {
            let rule: RenameRule = rule.parse().unwrap();
            assert_eq!(rule.apply("created_at"), expected);
        }
        assert!("Title Case".parse::<RenameRule>().is_err());
    }

    #[test]
    fn test_explicit_rename_wins() {
        let mut f = field("created_at");
        assert_eq!(f.serialized_name(None), "created_at");
        assert_eq!(f.serialized_name(Some(RenameRule::Camel)), "createdAt");

        f.rename = Some("created".into());
        assert_eq!(f.serialized_name(Some(RenameRule::Camel)), "created");
    }
}
