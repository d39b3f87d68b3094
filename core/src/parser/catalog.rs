#![deny(missing_docs)]

//! # Model Catalog
//!
//! Parsed structs grouped by namespace, and the mapping from Rust type
//! strings onto [`TypeDescriptor`]s.
//!
//! Struct references are resolved lazily. A record's members are only looked
//! up when the schema builder reaches them, so self-referential models stay
//! finite. Lookups try the referring namespace first, then every other
//! namespace in name order. Names that match nothing degrade to the generic
//! `object` fallback.

use crate::descriptor::{FieldDescriptor, PrimitiveKind, RecordDescriptor, TypeDescriptor};
use crate::error::AppResult;
use crate::parser::extractors::extract_models;
use crate::parser::models::ParsedStruct;
use crate::parser::types::{parse_type, TypeExpr};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
struct ModelIndex {
    namespaces: BTreeMap<String, BTreeMap<String, ParsedStruct>>,
}

/// Parsed models available for type resolution.
///
/// Descriptors handed out keep a snapshot of the catalog as it was when they
/// were resolved.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    index: Arc<ModelIndex>,
}

impl ModelCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `code` and adds every struct under `namespace`.
    ///
    /// Returns the number of structs added.
    pub fn add_source(&mut self, namespace: &str, code: &str) -> AppResult<usize> {
        let models = extract_models(code)?;
        let count = models.len();
        for model in models {
            self.insert(namespace, model);
        }
        tracing::debug!(namespace, count, "added models");
        Ok(count)
    }

    /// Adds (or replaces) one struct.
    pub fn insert(&mut self, namespace: &str, model: ParsedStruct) {
        Arc::make_mut(&mut self.index)
            .namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(model.name.clone(), model);
    }

    /// Looks up a struct by exact namespace and name.
    pub fn get(&self, namespace: &str, name: &str) -> Option<&ParsedStruct> {
        self.index.namespaces.get(namespace)?.get(name)
    }

    /// Namespaces in name order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.index.namespaces.keys().map(String::as_str)
    }

    /// Total number of structs.
    pub fn len(&self) -> usize {
        self.index.namespaces.values().map(BTreeMap::len).sum()
    }

    /// Returns true if no struct has been added.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The record descriptor of `name`, as seen from `namespace`.
    pub fn record(&self, namespace: &str, name: &str) -> Option<RecordDescriptor> {
        let (owner, model) = self.index.lookup(namespace, name)?;
        Some(build_record(&self.index, owner, model))
    }

    /// Maps a Rust type string onto a descriptor.
    pub fn resolve_type(&self, namespace: &str, rust_type: &str) -> AppResult<TypeDescriptor> {
        let expr = parse_type(rust_type)?;
        Ok(describe_expr(&self.index, namespace, &expr))
    }

    /// Returns true if `rust_type` names only known primitives, containers
    /// and catalog structs.
    pub fn is_resolvable(&self, namespace: &str, rust_type: &str) -> bool {
        parse_type(rust_type).is_ok_and(|expr| self.index.knows(namespace, &expr))
    }
}

impl ModelIndex {
    fn lookup<'a>(&'a self, namespace: &str, name: &str) -> Option<(&'a str, &'a ParsedStruct)> {
        if let Some((owner, models)) = self.namespaces.get_key_value(namespace) {
            if let Some(model) = models.get(name) {
                return Some((owner.as_str(), model));
            }
        }

        self.namespaces
            .iter()
            .find_map(|(owner, models)| models.get(name).map(|model| (owner.as_str(), model)))
    }

    fn knows(&self, namespace: &str, expr: &TypeExpr) -> bool {
        match expr {
            TypeExpr::Named { name, args } => {
                let known = primitive_kind(name).is_some()
                    || is_pointer(name)
                    || is_sequence(name)
                    || is_datetime(name)
                    || self.lookup(namespace, name).is_some();
                known && args.iter().all(|arg| self.knows(namespace, arg))
            }
            TypeExpr::Reference(inner) | TypeExpr::Slice(inner) => self.knows(namespace, inner),
            TypeExpr::Other(_) => false,
        }
    }
}

fn describe_expr(index: &Arc<ModelIndex>, namespace: &str, expr: &TypeExpr) -> TypeDescriptor {
    match expr {
        TypeExpr::Named { name, args } => {
            let first = args.first();
            if let Some(kind) = primitive_kind(name) {
                TypeDescriptor::primitive(kind, name.as_str())
            } else if is_datetime(name) {
                TypeDescriptor::DateTime
            } else if let (true, Some(inner)) = (is_pointer(name), first) {
                TypeDescriptor::pointer(describe_expr(index, namespace, inner))
            } else if let (true, Some(element)) = (is_sequence(name), first) {
                TypeDescriptor::sequence(describe_expr(index, namespace, element))
            } else if index.lookup(namespace, name).is_some() {
                deferred_record(index, namespace, name)
            } else {
                tracing::debug!(namespace, name = %name, "unknown type, using generic schema");
                TypeDescriptor::primitive(PrimitiveKind::Other, name.as_str())
            }
        }
        TypeExpr::Reference(inner) => TypeDescriptor::pointer(describe_expr(index, namespace, inner)),
        TypeExpr::Slice(element) => {
            TypeDescriptor::sequence(describe_expr(index, namespace, element))
        }
        TypeExpr::Other(text) => TypeDescriptor::primitive(PrimitiveKind::Other, text.as_str()),
    }
}

fn deferred_record(index: &Arc<ModelIndex>, namespace: &str, name: &str) -> TypeDescriptor {
    let index = Arc::clone(index);
    let namespace = namespace.to_string();
    let name = name.to_string();

    TypeDescriptor::deferred(move || match index.lookup(&namespace, &name) {
        Some((owner, model)) => build_record(&index, owner, model).into(),
        None => TypeDescriptor::primitive(PrimitiveKind::Other, name.as_str()),
    })
}

fn build_record(index: &Arc<ModelIndex>, namespace: &str, model: &ParsedStruct) -> RecordDescriptor {
    let mut record = RecordDescriptor::new(namespace, model.name.as_str());
    record.description = model.description.clone();

    for parsed in &model.fields {
        let ty = match parse_type(&parsed.ty) {
            Ok(expr) => describe_expr(index, namespace, &expr),
            Err(e) => {
                tracing::warn!(field = %parsed.name, ty = %parsed.ty, error = %e, "unparseable field type");
                TypeDescriptor::primitive(PrimitiveKind::Other, parsed.ty.as_str())
            }
        };

        let mut field = FieldDescriptor::new(parsed.name.as_str(), ty);
        field.public = parsed.is_public;
        field.skip = parsed.is_skipped;
        field.description = parsed.description.clone();
        field.rules = parsed.rules.clone();
        let serialized = parsed.serialized_name(model.rename_all);
        if serialized != parsed.name {
            field.rename = Some(serialized);
        }
        record = record.field(field);
    }

    record
}

fn primitive_kind(name: &str) -> Option<PrimitiveKind> {
    match name {
        "bool" => Some(PrimitiveKind::Boolean),
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64" | "u128"
        | "usize" => Some(PrimitiveKind::Integer),
        "f32" | "f64" => Some(PrimitiveKind::Number),
        "String" | "str" | "char" | "Uuid" | "NaiveDate" => Some(PrimitiveKind::String),
        _ => None,
    }
}

fn is_datetime(name: &str) -> bool {
    matches!(name, "DateTime" | "NaiveDateTime")
}

fn is_pointer(name: &str) -> bool {
    matches!(name, "Option" | "Box" | "Arc" | "Rc" | "Cow")
}

fn is_sequence(name: &str) -> bool {
    matches!(name, "Vec" | "VecDeque" | "HashSet" | "BTreeSet")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;
    use crate::schema_builder::{example_for, schema_for};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const TODOS: &str = r#"
        /// A unit of work.
        #[serde(rename_all = "camelCase")]
        pub struct Todo {
            #[validate(required)]
            pub title: String,
            pub created_at: DateTime<Utc>,
            pub tags: Vec<Tag>,
            pub parent: Option<Box<Todo>>,
            pub extra: HashMap<String, String>,
            secret: String,
        }

        pub struct Tag {
            pub name: String,
        }
    "#;

    fn catalog() -> ModelCatalog {
        let mut catalog = ModelCatalog::new();
        catalog.add_source("todos", TODOS).unwrap();
        catalog
            .add_source("billing", "pub struct Tag { pub code: u32 }")
            .unwrap();
        catalog
    }

    #[test]
    fn test_add_source() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.namespaces().collect::<Vec<_>>(), vec!["billing", "todos"]);
        assert!(catalog.get("todos", "Todo").is_some());
        assert!(catalog.get("billing", "Todo").is_none());
    }

    #[test]
    fn test_same_namespace_wins() {
        let catalog = catalog();
        let from_todos = catalog.record("todos", "Tag").unwrap();
        assert_eq!(from_todos.fields[0].name, "name");

        let from_billing = catalog.record("billing", "Tag").unwrap();
        assert_eq!(from_billing.fields[0].name, "code");

        let from_elsewhere = catalog.record("other", "Todo").unwrap();
        assert_eq!(from_elsewhere.namespace, "todos");
    }

    #[test]
    fn test_record_fields() {
        let record = catalog().record("todos", "Todo").unwrap();
        assert_eq!(record.description.as_deref(), Some("A unit of work."));

        let created = &record.fields[1];
        assert_eq!(created.serialized_name(), "createdAt");
        assert!(matches!(created.ty, TypeDescriptor::DateTime));
        assert!(record.fields[0].rules.required);
        assert!(!record.fields[5].is_documented());
    }

    #[test]
    fn test_resolve_type_builds_schema() {
        let catalog = catalog();
        let registry = TypeRegistry::new();
        let ty = catalog.resolve_type("todos", "Vec<Todo>").unwrap();

        let schema = serde_json::to_value(schema_for(&registry, &ty)).unwrap();
        assert_eq!(schema["type"], json!("array"));
        assert_eq!(
            schema["items"]["properties"]["parent"],
            json!({"$ref": "#/components/schemas/Todo"})
        );
        assert_eq!(
            schema["items"]["properties"]["tags"]["items"]["properties"]["name"]["type"],
            json!("string")
        );
        assert_eq!(schema["items"]["properties"]["extra"], json!({"type": "object"}));
        assert_eq!(schema["items"]["required"], json!(["title"]));
        assert!(schema["items"]["properties"].get("secret").is_none());

        let example = serde_json::to_value(example_for(&registry, &ty)).unwrap();
        assert_eq!(example[0]["title"], json!("example"));
        assert_eq!(example[0]["tags"], json!([{"name": "example"}]));
        assert!(example[0].get("parent").is_none());
    }

    #[test]
    fn test_unknown_types_degrade() {
        let catalog = ModelCatalog::new();
        let ty = catalog.resolve_type("app", "Money").unwrap();
        assert!(matches!(
            ty,
            TypeDescriptor::Primitive { kind: PrimitiveKind::Other, .. }
        ));
        assert!(!catalog.is_resolvable("app", "Money"));
        assert!(catalog.is_resolvable("app", "Option<Vec<i64>>"));
        assert!(catalog.resolve_type("app", "").is_err());
    }
}
