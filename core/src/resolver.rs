//! # Reference Resolver
//!
//! Swaps inline schemas that duplicate a collected component for `$ref`s.
//!
//! Only the top of each content schema is considered, descending through
//! nested arrays to their element. Properties nested inside an inline schema
//! stay as they are, and so do component bodies.

use crate::collector::{generate_schema_name, ComponentTable};
use crate::oas::document::{MediaType, Parameter, RequestBody, Response};
use crate::oas::schema::{RefOr, Reference, SchemaNode};

/// Resolves one content schema against `components`.
///
/// - A named object present in `components` becomes a reference.
/// - An array whose element is a named object present in `components` keeps
///   its wrapper and gets a reference as element.
/// - An array of arrays keeps both wrappers and resolves the inner one.
/// - Anything else is returned unchanged.
pub fn resolve_schema(schema: RefOr<SchemaNode>, components: &ComponentTable) -> RefOr<SchemaNode> {
    let mut node = match schema {
        RefOr::T(node) => node,
        reference => return reference,
    };

    if node.is_object() {
        if let Some(name) = registered_name(&node, components) {
            return RefOr::Ref(Reference::component(&name));
        }
    }

    if node.is_array() {
        if let Some(items) = node.items.as_deref_mut() {
            let element_name = items
                .as_inline()
                .filter(|element| element.is_object())
                .and_then(|element| registered_name(element, components));
            if let Some(name) = element_name {
                *items = RefOr::Ref(Reference::component(&name));
            } else if items.as_inline().is_some_and(SchemaNode::is_array) {
                let inner = std::mem::replace(items, RefOr::T(SchemaNode::default()));
                *items = resolve_schema(inner, components);
            }
        }
    }

    RefOr::T(node)
}

/// Resolves the schema of a content entry.
pub fn resolve_media(media: MediaType, components: &ComponentTable) -> MediaType {
    MediaType {
        schema: resolve_schema(media.schema, components),
        ..media
    }
}

/// Resolves the schema of a parameter.
pub fn resolve_parameter(parameter: Parameter, components: &ComponentTable) -> Parameter {
    Parameter {
        schema: resolve_schema(parameter.schema, components),
        ..parameter
    }
}

/// Resolves every content entry of a request body.
pub fn resolve_request_body(body: RequestBody, components: &ComponentTable) -> RequestBody {
    RequestBody {
        content: body
            .content
            .into_iter()
            .map(|(content_type, media)| (content_type, resolve_media(media, components)))
            .collect(),
        ..body
    }
}

/// Resolves every content entry of a response.
pub fn resolve_response(response: Response, components: &ComponentTable) -> Response {
    Response {
        content: response
            .content
            .into_iter()
            .map(|(content_type, media)| (content_type, resolve_media(media, components)))
            .collect(),
        ..response
    }
}

fn registered_name(node: &SchemaNode, components: &ComponentTable) -> Option<String> {
    if node.opaque {
        return None;
    }
    generate_schema_name(node).filter(|name| components.contains_key(name))
}
