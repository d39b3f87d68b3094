//! # Schema Collector
//!
//! Harvests every named object schema reachable from request bodies and
//! responses into a fresh [`ComponentTable`].

use crate::oas::schema::{RefOr, SchemaNode};
use crate::registry::sanitize_schema_name;
use crate::route::RouteDescriptor;
use crate::schema_builder::ARRAY_MARKER;
use std::collections::BTreeMap;

/// Component name -> schema. Built per document, never shared.
pub type ComponentTable = BTreeMap<String, SchemaNode>;

/// The component name a node is (or would be) registered under.
///
/// Strips a leading array marker and sanitizes the rest. Nodes without a
/// display-type-name have no component name.
pub fn generate_schema_name(node: &SchemaNode) -> Option<String> {
    let name = node.type_name()?;
    let name = name.strip_prefix(ARRAY_MARKER).unwrap_or(name);
    if name.is_empty() {
        None
    } else {
        Some(sanitize_schema_name(name))
    }
}

/// Walks all request and response content of `routes`.
///
/// Generic fallback objects are skipped, so `serde_json::Value` and other
/// unmappable types never become empty components.
/// A later registration under an existing name replaces the earlier one.
pub fn collect_components(routes: &[RouteDescriptor]) -> ComponentTable {
    let mut table = ComponentTable::new();

    for route in routes {
        let request = route
            .request_body
            .iter()
            .flat_map(|body| body.content.values());
        let responses = route
            .responses
            .values()
            .flat_map(|response| response.content.values());

        for media in request.chain(responses) {
            visit(&media.schema, &mut table);
        }
    }

    tracing::debug!(components = table.len(), "collected component schemas");
    table
}

fn visit(schema: &RefOr<SchemaNode>, table: &mut ComponentTable) {
    let RefOr::T(node) = schema else {
        return;
    };

    if node.is_array() {
        if let Some(items) = node.items.as_deref() {
            visit(items, table);
        }
        return;
    }

    if !node.is_object() || node.opaque {
        return;
    }

    if let Some(name) = generate_schema_name(node) {
        tracing::trace!(name = %name, "registering component");
        table.insert(name, node.clone());
    }

    for property in node.properties.values() {
        visit(property, table);
    }
}
