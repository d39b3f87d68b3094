#![deny(missing_docs)]

//! # Schema Builder
//!
//! Derives a [`SchemaNode`] tree and an [`Example`] tree from a [`TypeDescriptor`].
//!
//! - Indirections are unwrapped without emitting a node.
//! - The date/time composite becomes a `date-time` string.
//! - Records become objects named through the [`TypeRegistry`].
//! - Sequences become arrays named `"[]" + element name`.
//! - Everything else maps onto a scalar, or `object` as the generic fallback.
//!
//! Building never fails. A record that is re-entered while it is still being
//! built is emitted as a reference to its component instead of recursing.

use crate::describe::Describe;
use crate::descriptor::{FieldDescriptor, PrimitiveKind, RecordDescriptor, TypeDescriptor};
use crate::oas::schema::{Example, RefOr, Reference, SchemaNode, SchemaType};
use crate::registry::{sanitize_schema_name, TypeIdentity, TypeRegistry};
use indexmap::IndexMap;

/// Canonical example of the date/time composite.
pub const DATETIME_EXAMPLE: &str = "2025-02-22T08:36:06.224266+01:00";

/// Display name of the date/time composite.
pub const DATETIME_TYPE_NAME: &str = "DateTime";

/// Marker prefixed to the display name of arrays.
pub const ARRAY_MARKER: &str = "[]";

/// Recursive schema builder bound to a registry.
pub struct SchemaBuilder<'r> {
    registry: &'r TypeRegistry,
    /// Records currently being built, outermost first.
    stack: Vec<TypeIdentity>,
}

impl<'r> SchemaBuilder<'r> {
    /// Creates a builder that names records through `registry`.
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            stack: Vec::new(),
        }
    }

    /// Builds the schema of `ty`.
    pub fn build(&mut self, ty: &TypeDescriptor) -> RefOr<SchemaNode> {
        match ty {
            TypeDescriptor::Pointer(inner) => self.build(inner),
            TypeDescriptor::Deferred(deferred) => self.build(&deferred.resolve()),
            TypeDescriptor::DateTime => RefOr::T(SchemaNode {
                example: Some(Example::from(DATETIME_EXAMPLE)),
                type_name: Some(DATETIME_TYPE_NAME.to_string()),
                ..SchemaNode::of_type(SchemaType::String).with_format("date-time")
            }),
            TypeDescriptor::Record(record) => self.build_record(record),
            TypeDescriptor::Sequence(element) => {
                let items = self.build(element);
                let type_name = format!("{ARRAY_MARKER}{}", display_name_of(&items));
                RefOr::T(SchemaNode {
                    type_name: Some(type_name),
                    ..SchemaNode::array(items)
                })
            }
            TypeDescriptor::Primitive { kind, name } => RefOr::T(SchemaNode {
                example: canned_example(*kind),
                type_name: Some(name.clone()),
                opaque: *kind == PrimitiveKind::Other,
                ..SchemaNode::of_type(schema_type_of(*kind))
            }),
        }
    }

    /// Builds the example value of `ty`. `None` means "no example".
    pub fn example(&mut self, ty: &TypeDescriptor) -> Option<Example> {
        match ty {
            TypeDescriptor::Pointer(inner) => self.example(inner),
            TypeDescriptor::Deferred(deferred) => self.example(&deferred.resolve()),
            TypeDescriptor::DateTime => Some(Example::from(DATETIME_EXAMPLE)),
            TypeDescriptor::Record(record) => self.record_example(record),
            TypeDescriptor::Sequence(element) => {
                self.example(element).map(|item| Example::Array(vec![item]))
            }
            TypeDescriptor::Primitive { kind, .. } => canned_example(*kind),
        }
    }

    fn build_record(&mut self, record: &RecordDescriptor) -> RefOr<SchemaNode> {
        let identity = record.identity();

        if self.stack.contains(&identity) {
            let name = self.registry.peek_name(&identity);
            tracing::trace!(identity = %identity, "recursive record, emitting reference");
            return RefOr::Ref(Reference::component(&sanitize_schema_name(&name)));
        }

        self.stack.push(identity.clone());
        let mut node = SchemaNode::of_type(SchemaType::Object);
        node.description = record.description.clone();

        for field in record.fields.iter().filter(|field| field.is_documented()) {
            let name = field.serialized_name().to_string();
            if field.rules.required {
                node.required.push(name.clone());
            }

            let mut schema = self.build(&field.ty);
            if let RefOr::T(member) = &mut schema {
                apply_field_metadata(member, field);
            }
            node.properties.insert(name, schema);
        }
        self.stack.pop();

        node.example = self.record_example(record);
        node.type_name = Some(self.registry.register(&identity));
        tracing::trace!(identity = %identity, properties = node.properties.len(), "built record schema");

        RefOr::T(node)
    }

    fn record_example(&mut self, record: &RecordDescriptor) -> Option<Example> {
        let identity = record.identity();
        if self.stack.contains(&identity) {
            return None;
        }

        self.stack.push(identity);
        let mut example = IndexMap::new();
        for field in record.fields.iter().filter(|field| field.is_documented()) {
            if let Some(value) = self.example(&field.ty) {
                example.insert(field.serialized_name().to_string(), value);
            }
        }
        self.stack.pop();

        Some(Example::Object(example))
    }
}

/// Builds the schema of `ty` with a fresh builder.
pub fn schema_for(registry: &TypeRegistry, ty: &TypeDescriptor) -> RefOr<SchemaNode> {
    SchemaBuilder::new(registry).build(ty)
}

/// Builds the example of `ty` with a fresh builder.
pub fn example_for(registry: &TypeRegistry, ty: &TypeDescriptor) -> Option<Example> {
    SchemaBuilder::new(registry).example(ty)
}

/// Builds the schema of `T`.
pub fn schema_of<T: Describe + ?Sized>(registry: &TypeRegistry) -> RefOr<SchemaNode> {
    schema_for(registry, &T::describe())
}

/// The display-type-name of a built schema. References yield their target.
pub fn display_name_of(schema: &RefOr<SchemaNode>) -> String {
    match schema {
        RefOr::T(node) => node.type_name().unwrap_or_default().to_string(),
        RefOr::Ref(reference) => reference.component_name().unwrap_or_default().to_string(),
    }
}

fn schema_type_of(kind: PrimitiveKind) -> SchemaType {
    match kind {
        PrimitiveKind::Boolean => SchemaType::Boolean,
        PrimitiveKind::Integer => SchemaType::Integer,
        PrimitiveKind::Number => SchemaType::Number,
        PrimitiveKind::String => SchemaType::String,
        PrimitiveKind::Other => SchemaType::Object,
    }
}

#[allow(clippy::approx_constant)]
fn canned_example(kind: PrimitiveKind) -> Option<Example> {
    match kind {
        PrimitiveKind::Boolean => Some(Example::Bool(true)),
        PrimitiveKind::Integer => Some(Example::Integer(42)),
        PrimitiveKind::Number => Some(Example::Number(3.14)),
        PrimitiveKind::String => Some(Example::from("example")),
        PrimitiveKind::Other => None,
    }
}

/// Attaches bounds, enumerations, nullability and description to a member.
fn apply_field_metadata(member: &mut SchemaNode, field: &FieldDescriptor) {
    let rules = &field.rules;

    match member.schema_type {
        Some(SchemaType::String) => {
            member.min_length = rules.min.and_then(|n| usize::try_from(n).ok());
            member.max_length = rules.max.and_then(|n| usize::try_from(n).ok());
        }
        Some(SchemaType::Integer) | Some(SchemaType::Number) => {
            member.minimum = rules.min.map(|n| n as f64);
        }
        _ => {}
    }

    if !rules.one_of.is_empty() {
        member.enumeration = rules
            .one_of
            .iter()
            .map(|value| enum_value(member.schema_type, value))
            .collect();
    }

    if rules.nullable {
        member.nullable = true;
    }

    if let Some(description) = &field.description {
        member.description = Some(description.clone());
    }
}

fn enum_value(schema_type: Option<SchemaType>, raw: &str) -> Example {
    let parsed = match schema_type {
        Some(SchemaType::Integer) => raw.parse().ok().map(Example::Integer),
        Some(SchemaType::Number) => raw.parse().ok().map(Example::Number),
        Some(SchemaType::Boolean) => raw.parse().ok().map(Example::Bool),
        _ => None,
    };
    parsed.unwrap_or_else(|| Example::from(raw))
}
