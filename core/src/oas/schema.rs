//! # Schema Nodes
//!
//! The schema tree shared by the builder, collector, resolver and document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Prefix of every component reference.
pub const COMPONENT_REF_PREFIX: &str = "#/components/schemas/";

/// The `type` keyword values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// `object`, also the generic fallback.
    Object,
    /// `array`
    Array,
    /// `string`
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
}

/// A `{"$ref": ...}` pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// The reference target.
    #[serde(rename = "$ref")]
    pub ref_location: String,
}

impl Reference {
    /// Reference to the component schema `name`.
    pub fn component(name: &str) -> Self {
        Self {
            ref_location: format!("{COMPONENT_REF_PREFIX}{name}"),
        }
    }

    /// The component name, if this points into `#/components/schemas/`.
    pub fn component_name(&self) -> Option<&str> {
        self.ref_location.strip_prefix(COMPONENT_REF_PREFIX)
    }
}

/// Either a reference or an inline value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// A reference.
    Ref(Reference),
    /// An inline value.
    T(T),
}

impl<T> RefOr<T> {
    /// The inline value, if any.
    pub fn as_inline(&self) -> Option<&T> {
        match self {
            RefOr::T(value) => Some(value),
            RefOr::Ref(_) => None,
        }
    }

    /// The inline value, if any.
    pub fn as_inline_mut(&mut self) -> Option<&mut T> {
        match self {
            RefOr::T(value) => Some(value),
            RefOr::Ref(_) => None,
        }
    }

    /// The reference, if any.
    pub fn as_ref_location(&self) -> Option<&Reference> {
        match self {
            RefOr::Ref(reference) => Some(reference),
            RefOr::T(_) => None,
        }
    }
}

impl From<SchemaNode> for RefOr<SchemaNode> {
    fn from(node: SchemaNode) -> Self {
        RefOr::T(node)
    }
}

impl From<Reference> for RefOr<SchemaNode> {
    fn from(reference: Reference) -> Self {
        RefOr::Ref(reference)
    }
}

/// An example value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Example {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integral number.
    Integer(i64),
    /// Floating point number.
    Number(f64),
    /// String.
    String(String),
    /// Sequence.
    Array(Vec<Example>),
    /// Mapping, in insertion order.
    Object(IndexMap<String, Example>),
}

impl From<bool> for Example {
    fn from(value: bool) -> Self {
        Example::Bool(value)
    }
}

impl From<i64> for Example {
    fn from(value: i64) -> Self {
        Example::Integer(value)
    }
}

impl From<f64> for Example {
    fn from(value: f64) -> Self {
        Example::Number(value)
    }
}

impl From<&str> for Example {
    fn from(value: &str) -> Self {
        Example::String(value.to_string())
    }
}

impl From<String> for Example {
    fn from(value: String) -> Self {
        Example::String(value)
    }
}

impl From<serde_json::Value> for Example {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Example::Null,
            Value::Bool(b) => Example::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Example::Integer(i),
                None => Example::Number(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => Example::String(s),
            Value::Array(items) => Example::Array(items.into_iter().map(Example::from).collect()),
            Value::Object(map) => Example::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Example::from(value)))
                    .collect(),
            ),
        }
    }
}

/// One node of a schema tree.
///
/// `type_name` is the display-type-name assigned while building. It is never
/// serialized and only drives component collection and reference resolution.
/// Nodes marked `opaque` keep their name but are never collected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// `type`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// `format`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// `description`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Element schema of arrays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<RefOr<SchemaNode>>>,
    /// Named properties of objects.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, RefOr<SchemaNode>>,
    /// Required property names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// `additionalProperties`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<RefOr<SchemaNode>>>,
    /// `minLength`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// `maxLength`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// `minimum`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// `maximum`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// `enum`
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enumeration: Vec<Example>,
    /// `allOf`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<RefOr<SchemaNode>>,
    /// `oneOf`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<RefOr<SchemaNode>>,
    /// `anyOf`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<RefOr<SchemaNode>>,
    /// `nullable`
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    /// `example`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Example>,
    /// Display-type-name, build-time only.
    #[serde(skip)]
    pub type_name: Option<String>,
    /// Set on the generic fallback of unmappable types. Build-time only.
    #[serde(skip)]
    pub opaque: bool,
}

impl SchemaNode {
    /// A node of the given type and nothing else.
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// An array of `items`.
    pub fn array(items: impl Into<RefOr<SchemaNode>>) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(items.into())),
            ..Self::default()
        }
    }

    /// Sets the format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true for `type: object`.
    pub fn is_object(&self) -> bool {
        self.schema_type == Some(SchemaType::Object)
    }

    /// Returns true for `type: array`.
    pub fn is_array(&self) -> bool {
        self.schema_type == Some(SchemaType::Array)
    }

    /// The display-type-name, if set and non-empty.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref().filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reference_wire_shape() {
        let schema: RefOr<SchemaNode> = Reference::component("Todo").into();
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({"$ref": "#/components/schemas/Todo"})
        );
        assert_eq!(
            schema.as_ref_location().and_then(Reference::component_name),
            Some("Todo")
        );
    }

    #[test]
    fn test_type_name_is_not_serialized() {
        let mut node = SchemaNode::of_type(SchemaType::Object);
        node.type_name = Some("Todo".into());
        node.required.push("title".into());
        node.properties.insert(
            "title".into(),
            SchemaNode::of_type(SchemaType::String).into(),
        );

        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "type": "object",
                "properties": {"title": {"type": "string"}},
                "required": ["title"]
            })
        );
    }

    #[test]
    fn test_empty_node_serializes_to_empty_object() {
        assert_eq!(serde_json::to_value(SchemaNode::default()).unwrap(), json!({}));
    }

    #[test]
    fn test_deserialize_prefers_reference() {
        let parsed: RefOr<SchemaNode> =
            serde_json::from_value(json!({"$ref": "#/components/schemas/User"})).unwrap();
        assert!(parsed.as_ref_location().is_some());

        let parsed: RefOr<SchemaNode> =
            serde_json::from_value(json!({"type": "array", "items": {"type": "integer"}})).unwrap();
        let node = parsed.as_inline().unwrap();
        assert!(node.is_array());
    }

    #[test]
    fn test_example_from_json() {
        let example = Example::from(json!({"id": 1, "ratio": 0.5, "tags": ["a"], "done": null}));
        assert_eq!(
            serde_json::to_value(&example).unwrap(),
            json!({"id": 1, "ratio": 0.5, "tags": ["a"], "done": null})
        );
        match example {
            Example::Object(map) => {
                assert_eq!(map["id"], Example::Integer(1));
                assert_eq!(map["ratio"], Example::Number(0.5));
            }
            other => panic!("expected object, got {:?}", other),
        }
    }
}
