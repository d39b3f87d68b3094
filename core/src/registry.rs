#![deny(missing_docs)]

//! # Type Registry
//!
//! Assigns stable, collision-free component names to record types.
//!
//! The first type seen with a given simple name keeps that name. When a second
//! type with the same simple name but another namespace shows up, both are
//! qualified with their namespace (`ns_Name`), provided the first one has only
//! been seen once so far. All names are passed through [`sanitize_schema_name`].

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;

/// Language-level identity of a record type: `(namespace, simple name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity {
    /// Module path or other namespace the type lives in (e.g. `app::todos`).
    pub namespace: String,
    /// Unqualified type name (e.g. `Todo`).
    pub name: String,
}

impl TypeIdentity {
    /// Creates a new identity.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Returns `namespace.name`, the registry's qualified key.
    pub fn full_key(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    fn qualified_name(&self) -> String {
        sanitize_schema_name(&format!("{}_{}", self.namespace, self.name))
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// A single registered type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Unqualified type name.
    pub name: String,
    /// Namespace of the type.
    pub namespace: String,
    /// How many times this identity has been registered.
    pub occurrences: usize,
    /// The component name handed out for this identity.
    pub display_name: String,
}

#[derive(Debug, Default)]
struct RegistryState {
    entries: Vec<RegistryEntry>,
    /// `namespace.name` -> entry index. Every entry is indexed here.
    qualified: HashMap<String, usize>,
    /// `name` -> entry index, only while the entry still owns the bare name.
    unqualified: HashMap<String, usize>,
}

/// Maps type identities to component names.
///
/// All access goes through one reader/writer lock, so a collision rewrite is
/// atomic with respect to concurrent registrations.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    state: RwLock<RegistryState>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `identity` and returns the component name to use for it.
    ///
    /// Registering the same identity again returns the same name. The only
    /// name that can change afterwards is that of a type which was seen
    /// exactly once and then collided with a type from another namespace.
    pub fn register(&self, identity: &TypeIdentity) -> String {
        let full_key = identity.full_key();
        let mut state = self.state.write();

        if let Some(&idx) = state.qualified.get(&full_key) {
            let entry = &mut state.entries[idx];
            entry.occurrences += 1;
            return entry.display_name.clone();
        }

        if let Some(&existing_idx) = state.unqualified.get(&identity.name) {
            let existing = &mut state.entries[existing_idx];
            if existing.occurrences == 1 && existing.display_name == existing.name {
                let existing_identity =
                    TypeIdentity::new(existing.namespace.clone(), existing.name.clone());
                existing.display_name = existing_identity.qualified_name();
                tracing::debug!(
                    name = %identity.name,
                    existing = %existing.namespace,
                    incoming = %identity.namespace,
                    renamed = %existing.display_name,
                    "type name collision, qualifying existing entry"
                );
                state.unqualified.remove(&identity.name);
            }

            let display_name = identity.qualified_name();
            let idx = state.entries.len();
            state.entries.push(RegistryEntry {
                name: identity.name.clone(),
                namespace: identity.namespace.clone(),
                occurrences: 1,
                display_name: display_name.clone(),
            });
            state.qualified.insert(full_key, idx);
            return display_name;
        }

        let idx = state.entries.len();
        state.entries.push(RegistryEntry {
            name: identity.name.clone(),
            namespace: identity.namespace.clone(),
            occurrences: 1,
            display_name: identity.name.clone(),
        });
        state.unqualified.insert(identity.name.clone(), idx);
        state.qualified.insert(full_key, idx);
        tracing::trace!(identity = %identity, "registered type");

        identity.name.clone()
    }

    /// Returns the current component name of `identity` without registering it.
    pub fn display_name(&self, identity: &TypeIdentity) -> Option<String> {
        let state = self.state.read();
        state
            .qualified
            .get(&identity.full_key())
            .map(|&idx| state.entries[idx].display_name.clone())
    }

    /// Returns the name [`register`](Self::register) would hand out for
    /// `identity` right now, without recording an occurrence.
    pub fn peek_name(&self, identity: &TypeIdentity) -> String {
        let state = self.state.read();
        if let Some(&idx) = state.qualified.get(&identity.full_key()) {
            return state.entries[idx].display_name.clone();
        }
        if state.unqualified.contains_key(&identity.name) {
            identity.qualified_name()
        } else {
            identity.name.clone()
        }
    }

    /// Returns a snapshot of the entry for `identity`.
    pub fn entry(&self, identity: &TypeIdentity) -> Option<RegistryEntry> {
        let state = self.state.read();
        state
            .qualified
            .get(&identity.full_key())
            .map(|&idx| state.entries[idx].clone())
    }

    /// Number of distinct identities seen.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Returns true when nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Makes a qualified type name usable as a component key.
///
/// Replaces `.`, `/` and `-` with `_`. Consumers resolve `$ref` strings by
/// exact name, so this mapping is part of the output contract.
pub fn sanitize_schema_name(name: &str) -> String {
    name.replace(['.', '/', '-'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let registry = TypeRegistry::new();
        let todo = TypeIdentity::new("app/todos", "Todo");

        assert_eq!(registry.register(&todo), "Todo");
        assert_eq!(registry.register(&todo), "Todo");
        assert_eq!(registry.entry(&todo).unwrap().occurrences, 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_collision_qualifies_both_names() {
        let registry = TypeRegistry::new();
        let first = TypeIdentity::new("ns1", "Foo");
        let second = TypeIdentity::new("ns2", "Foo");

        assert_eq!(registry.register(&first), "Foo");
        assert_eq!(registry.register(&second), "ns2_Foo");

        // The first entry was rewritten and keeps its new name from now on.
        assert_eq!(registry.display_name(&first).as_deref(), Some("ns1_Foo"));
        assert_eq!(registry.register(&first), "ns1_Foo");
    }

    #[test]
    fn test_collision_sanitizes_namespace() {
        let registry = TypeRegistry::new();
        registry.register(&TypeIdentity::new("example.com/api-v1", "User"));
        let name = registry.register(&TypeIdentity::new("example.com/api-v2", "User"));

        assert_eq!(name, "example_com_api_v2_User");
        assert_eq!(
            registry
                .display_name(&TypeIdentity::new("example.com/api-v1", "User"))
                .as_deref(),
            Some("example_com_api_v1_User")
        );
    }

    #[test]
    fn test_repeated_entry_is_not_rewritten() {
        let registry = TypeRegistry::new();
        let first = TypeIdentity::new("ns1", "Foo");
        registry.register(&first);
        registry.register(&first);

        let second = TypeIdentity::new("ns2", "Foo");
        assert_eq!(registry.register(&second), "ns2_Foo");
        assert_eq!(registry.register(&first), "Foo");
    }

    #[test]
    fn test_third_namespace_after_rewrite() {
        let registry = TypeRegistry::new();
        let a = registry.register(&TypeIdentity::new("a", "Item"));
        let b = registry.register(&TypeIdentity::new("b", "Item"));
        let c = registry.register(&TypeIdentity::new("c", "Item"));

        assert_eq!(a, "Item");
        assert_eq!(b, "b_Item");
        // The bare name was released by the rewrite of `a.Item`.
        assert_eq!(c, "Item");

        let names = [
            registry.display_name(&TypeIdentity::new("a", "Item")).unwrap(),
            registry.display_name(&TypeIdentity::new("b", "Item")).unwrap(),
            registry.display_name(&TypeIdentity::new("c", "Item")).unwrap(),
        ];
        assert_eq!(names, ["a_Item", "b_Item", "Item"]);
    }

    #[test]
    fn test_peek_name_does_not_register() {
        let registry = TypeRegistry::new();
        let first = TypeIdentity::new("ns1", "Foo");
        let second = TypeIdentity::new("ns2", "Foo");

        assert_eq!(registry.peek_name(&first), "Foo");
        assert!(registry.is_empty());

        registry.register(&first);
        assert_eq!(registry.peek_name(&first), "Foo");
        assert_eq!(registry.peek_name(&second), "ns2_Foo");
        assert_eq!(registry.entry(&first).unwrap().occurrences, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_identity_has_no_name() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.display_name(&TypeIdentity::new("x", "Y")).is_none());
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for input in ["a.b/c-d", "plain", "", "..//--", "time.Time", "ns_Foo"] {
            let once = sanitize_schema_name(input);
            assert_eq!(sanitize_schema_name(&once), once);
            assert!(!once.contains(['.', '/', '-']));
        }
        assert_eq!(sanitize_schema_name("github.com/acme/api-models"), "github_com_acme_api_models");
    }

    #[test]
    fn test_concurrent_registration_yields_distinct_names() {
        let registry = TypeRegistry::new();
        std::thread::scope(|scope| {
            for i in 0..8 {
                let registry = &registry;
                scope.spawn(move || registry.register(&TypeIdentity::new(format!("ns{i}"), "Shared")));
            }
        });

        // Names handed out earlier may since have been qualified; the current
        // assignment must be collision-free.
        let names: Vec<String> = (0..8)
            .map(|i| {
                registry
                    .display_name(&TypeIdentity::new(format!("ns{i}"), "Shared"))
                    .unwrap()
            })
            .collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), names.len());
        assert_eq!(registry.len(), 8);
    }
}
