#![deny(missing_docs)]

//! # Route Catalog
//!
//! Registration-time collector of [`RouteDescriptor`]s.
//!
//! Stands in for the router: it knows method, path, group prefixes and the
//! tags and security a group applies to its routes, but dispatches nothing.
//!
//! ```
//! use routedoc_core::catalog::RouteCatalog;
//! use routedoc_core::route::with_summary;
//! use routedoc_core::TypeRegistry;
//!
//! let registry = TypeRegistry::new();
//! let mut catalog = RouteCatalog::new(&registry);
//! catalog.group("/api/v1", |api| {
//!     api.with_tags(["v1"]);
//!     api.get("/todos", vec![with_summary("List todos")]);
//! });
//! assert_eq!(catalog.routes()[0].path, "/api/v1/todos");
//! assert_eq!(catalog.routes()[0].tags, vec!["v1"]);
//! ```

use crate::error::{AppError, AppResult};
use crate::oas::document::SecurityRequirement;
use crate::registry::TypeRegistry;
use crate::route::{RouteDescriptor, RouteOption};

/// Collects documented routes.
#[derive(Debug)]
pub struct RouteCatalog<'r> {
    registry: &'r TypeRegistry,
    prefix: String,
    tags: Vec<String>,
    security: Vec<SecurityRequirement>,
    routes: Vec<RouteDescriptor>,
}

impl<'r> RouteCatalog<'r> {
    /// Creates an empty catalog that names types through `registry`.
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            prefix: String::new(),
            tags: Vec::new(),
            security: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// The registry options are applied with.
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Tags every route registered from now on.
    pub fn with_tags<I, S>(&mut self, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Adds security requirements to every route registered from now on.
    pub fn with_security<I>(&mut self, requirements: I) -> &mut Self
    where
        I: IntoIterator<Item = SecurityRequirement>,
    {
        self.security.extend(requirements);
        self
    }

    /// Registers a route from a `"METHOD /path"` pattern.
    pub fn handle(
        &mut self,
        pattern: &str,
        options: Vec<RouteOption>,
    ) -> AppResult<&RouteDescriptor> {
        let (method, path) = pattern
            .trim()
            .split_once(char::is_whitespace)
            .map(|(method, path)| (method, path.trim()))
            .filter(|(method, path)| !method.is_empty() && !path.is_empty())
            .ok_or_else(|| {
                AppError::General(format!(
                    "Invalid route pattern '{}', expected 'METHOD /path'",
                    pattern
                ))
            })?;

        Ok(self.route(method, path, options))
    }

    /// Registers a route.
    pub fn route(&mut self, method: &str, path: &str, options: Vec<RouteOption>) -> &RouteDescriptor {
        let full_path = normalize_path(&format!("{}/{}", self.prefix, path));
        let mut descriptor = RouteDescriptor::new(method, full_path);
        descriptor.tags.extend(self.tags.iter().cloned());
        descriptor.security.extend(self.security.iter().cloned());
        descriptor.apply(options, self.registry);

        tracing::trace!(method = %descriptor.method, path = %descriptor.path, "registered route");
        self.routes.push(descriptor);
        &self.routes[self.routes.len() - 1]
    }

    /// Registers a GET route.
    pub fn get(&mut self, path: &str, options: Vec<RouteOption>) -> &RouteDescriptor {
        self.route("GET", path, options)
    }

    /// Registers a POST route.
    pub fn post(&mut self, path: &str, options: Vec<RouteOption>) -> &RouteDescriptor {
        self.route("POST", path, options)
    }

    /// Registers a PUT route.
    pub fn put(&mut self, path: &str, options: Vec<RouteOption>) -> &RouteDescriptor {
        self.route("PUT", path, options)
    }

    /// Registers a DELETE route.
    pub fn delete(&mut self, path: &str, options: Vec<RouteOption>) -> &RouteDescriptor {
        self.route("DELETE", path, options)
    }

    /// Registers a PATCH route.
    pub fn patch(&mut self, path: &str, options: Vec<RouteOption>) -> &RouteDescriptor {
        self.route("PATCH", path, options)
    }

    /// Registers the routes added by `build` under `prefix`.
    ///
    /// The group starts with this catalog's tags and security; changes made
    /// inside the group do not leak out of it.
    pub fn group<F>(&mut self, prefix: &str, build: F) -> &mut Self
    where
        F: FnOnce(&mut RouteCatalog<'r>),
    {
        let mut group = RouteCatalog {
            registry: self.registry,
            prefix: format!("{}/{}", self.prefix, prefix),
            tags: self.tags.clone(),
            security: self.security.clone(),
            routes: Vec::new(),
        };
        build(&mut group);

        self.routes.append(&mut group.routes);
        self
    }

    /// Registered routes, in registration order.
    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// Consumes the catalog.
    pub fn into_routes(self) -> Vec<RouteDescriptor> {
        self.routes
    }
}

/// Normalizes a route path.
///
/// Ensures a single leading `/`, collapses repeated slashes, drops trailing
/// slashes and resolves `.` and `..` segments. The empty path becomes `/`.
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}
