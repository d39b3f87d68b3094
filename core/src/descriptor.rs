#![deny(missing_docs)]

//! # Type Descriptors
//!
//! An explicit description of a type's shape, consumed by the schema builder.
//! Descriptors come from [`Describe`](crate::describe::Describe) impls, from
//! hand-written builders, or from parsed Rust source (see [`crate::parser`]).

use crate::registry::TypeIdentity;
use std::fmt;
use std::sync::Arc;

/// The scalar categories a primitive maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `boolean`
    Boolean,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `string`
    String,
    /// Anything else. Rendered as a generic `object` without an example.
    Other,
}

/// The shape of a type.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    /// One level of indirection (`&T`, `Box<T>`, `Option<T>`, ...).
    Pointer(Box<TypeDescriptor>),
    /// The well-known date/time composite.
    DateTime,
    /// A record with named members.
    Record(Arc<RecordDescriptor>),
    /// A homogeneous sequence.
    Sequence(Box<TypeDescriptor>),
    /// A scalar.
    Primitive {
        /// Scalar category.
        kind: PrimitiveKind,
        /// Type name as written in the source language (`i64`, `String`, ...).
        name: String,
    },
    /// A descriptor produced on demand. Lets self-referential records stay finite.
    Deferred(Deferred),
}

impl TypeDescriptor {
    /// Wraps `inner` in one level of indirection.
    pub fn pointer(inner: TypeDescriptor) -> Self {
        Self::Pointer(Box::new(inner))
    }

    /// A sequence of `element`.
    pub fn sequence(element: TypeDescriptor) -> Self {
        Self::Sequence(Box::new(element))
    }

    /// A scalar of the given kind and source name.
    pub fn primitive(kind: PrimitiveKind, name: impl Into<String>) -> Self {
        Self::Primitive {
            kind,
            name: name.into(),
        }
    }

    /// A descriptor evaluated only when the builder reaches it.
    pub fn deferred<F>(resolve: F) -> Self
    where
        F: Fn() -> TypeDescriptor + Send + Sync + 'static,
    {
        Self::Deferred(Deferred(Arc::new(resolve)))
    }

    /// Returns the record descriptor if this is a record.
    pub fn as_record(&self) -> Option<&RecordDescriptor> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Returns true for string scalars, looking through indirections.
    pub fn is_string(&self) -> bool {
        match self {
            Self::Primitive { kind, .. } => *kind == PrimitiveKind::String,
            Self::Pointer(inner) => inner.is_string(),
            Self::Deferred(deferred) => deferred.resolve().is_string(),
            _ => false,
        }
    }
}

impl From<RecordDescriptor> for TypeDescriptor {
    fn from(record: RecordDescriptor) -> Self {
        Self::Record(Arc::new(record))
    }
}

/// A lazily produced [`TypeDescriptor`].
#[derive(Clone)]
pub struct Deferred(Arc<dyn Fn() -> TypeDescriptor + Send + Sync>);

impl Deferred {
    /// Produces the descriptor.
    pub fn resolve(&self) -> TypeDescriptor {
        (self.0)()
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred(..)")
    }
}

/// A record type and its members.
#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    /// Namespace of the record (module path).
    pub namespace: String,
    /// Unqualified record name.
    pub name: String,
    /// Description copied onto the object schema.
    pub description: Option<String>,
    /// Members in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    /// Creates a record with no members.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Sets the record description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a member.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// The registry key of this record.
    pub fn identity(&self) -> TypeIdentity {
        TypeIdentity::new(self.namespace.clone(), self.name.clone())
    }
}

/// A record member and its metadata.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Member name in the source language.
    pub name: String,
    /// Member type.
    pub ty: TypeDescriptor,
    /// Non-public members are left out of schemas.
    pub public: bool,
    /// Explicitly excluded from serialization.
    pub skip: bool,
    /// Serialized name override.
    pub rename: Option<String>,
    /// Description attached to the member's schema.
    pub description: Option<String>,
    /// Validation metadata.
    pub rules: FieldRules,
}

impl FieldDescriptor {
    /// Creates a public member of type `ty`.
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            public: true,
            skip: false,
            rename: None,
            description: None,
            rules: FieldRules::default(),
        }
    }

    /// Creates a public member whose type is described by `T`.
    pub fn of<T>(name: impl Into<String>) -> Self
    where
        T: crate::describe::Describe + ?Sized + 'static,
    {
        Self::new(name, TypeDescriptor::deferred(T::describe))
    }

    /// The name the member is serialized under.
    pub fn serialized_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }

    /// Whether the member takes part in the schema at all.
    pub fn is_documented(&self) -> bool {
        self.public && !self.skip
    }

    /// Serializes the member under `name`.
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    /// Sets the member description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Excludes the member from serialization.
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Marks the member as non-public.
    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    /// Marks the member as required.
    pub fn required(mut self) -> Self {
        self.rules.required = true;
        self
    }

    /// Minimum length (strings) or minimum value (numbers).
    pub fn min(mut self, min: i64) -> Self {
        self.rules.min = Some(min);
        self
    }

    /// Maximum length (strings only).
    pub fn max(mut self, max: i64) -> Self {
        self.rules.max = Some(max);
        self
    }

    /// Restricts the member to the given values.
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.one_of = values.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the member schema as nullable.
    pub fn nullable(mut self) -> Self {
        self.rules.nullable = true;
        self
    }

    /// Merges rules written in tag syntax, e.g. `"required,min=1,max=100"`.
    pub fn rules(mut self, spec: &str) -> Self {
        self.rules.merge(FieldRules::parse(spec));
        self
    }
}

/// Validation metadata of a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRules {
    /// Member must be present.
    pub required: bool,
    /// `min=N`.
    pub min: Option<i64>,
    /// `max=N`.
    pub max: Option<i64>,
    /// `oneof=a b c`.
    pub one_of: Vec<String>,
    /// `nullable`.
    pub nullable: bool,
}

impl FieldRules {
    /// Parses a comma-separated rule list.
    ///
    /// Unknown rules and malformed numbers are ignored.
    pub fn parse(spec: &str) -> Self {
        let mut rules = Self::default();

        for rule in spec.split(',').map(str::trim).filter(|r| !r.is_empty()) {
            if rule == "required" {
                rules.required = true;
            } else if rule == "nullable" {
                rules.nullable = true;
            } else if let Some(value) = rule.strip_prefix("min=") {
                if let Ok(n) = value.trim().parse() {
                    rules.min = Some(n);
                }
            } else if let Some(value) = rule.strip_prefix("max=") {
                if let Ok(n) = value.trim().parse() {
                    rules.max = Some(n);
                }
            } else if let Some(values) = rule.strip_prefix("oneof=") {
                rules.one_of = values.split_whitespace().map(str::to_string).collect();
            }
        }

        rules
    }

    /// Overlays `other` on top of `self`. Set values in `other` win.
    pub fn merge(&mut self, other: FieldRules) {
        self.required |= other.required;
        self.nullable |= other.nullable;
        if other.min.is_some() {
            self.min = other.min;
        }
        if other.max.is_some() {
            self.max = other.max;
        }
        if !other.one_of.is_empty() {
            self.one_of = other.one_of;
        }
    }
}
