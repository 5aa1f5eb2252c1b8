//! The flattened route table.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Result, RouterError};
use crate::path::{MatchMode, PathPattern};
use crate::request::PathParams;
use crate::resource::Resource;
use crate::service::Service;

/// Something that can be flattened into routes.
///
/// [`Service`] is the implementation used by [`crate::App`]; the trait is the
/// seam where another route source can be plugged in.
pub trait RouteSource {
    /// Returns every resource under its full path, in matching order.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::EmptyRouteTree`] when there is nothing to
    /// route to.
    fn flatten(&self) -> Result<Vec<Resource>>;
}

impl RouteSource for Service {
    fn flatten(&self) -> Result<Vec<Resource>> {
        if self.is_empty() {
            return Err(RouterError::EmptyRouteTree);
        }
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        Ok(out)
    }
}

/// A resource together with its compiled full pattern.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: PathPattern,
    resource: Resource,
}

impl Route {
    /// The compiled pattern.
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// The resource, carrying its full path.
    pub fn resource(&self) -> &Resource {
        &self.resource
    }
}

/// Ordered mapping from full pattern to resource.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: IndexMap<String, Route>,
}

impl RouteTable {
    /// Compiles flattened resources into a table.
    ///
    /// When two branches of the tree produce the same full pattern, the
    /// first one keeps its place.
    ///
    /// # Errors
    ///
    /// Fails on an unbound resource or a pattern that does not compile.
    pub fn build(resources: Vec<Resource>, mode: MatchMode) -> Result<Self> {
        let mut routes = IndexMap::with_capacity(resources.len());
        for resource in resources {
            if !resource.is_bound() {
                return Err(RouterError::UnboundResource(resource.path().to_string()));
            }
            if routes.contains_key(resource.path()) {
                debug!(pattern = resource.path(), "shadowed by an earlier route");
                continue;
            }
            let pattern = PathPattern::new(resource.path(), mode)?;
            routes.insert(resource.path().to_string(), Route { pattern, resource });
        }
        Ok(Self { routes })
    }

    /// Finds the first route whose pattern matches `path`.
    pub fn find(&self, path: &str) -> Option<(&Resource, PathParams)> {
        self.routes.values().find_map(|route| {
            route
                .pattern
                .match_path(path)
                .map(|params| (&route.resource, params))
        })
    }

    /// Looks a resource up by its full pattern.
    pub fn get(&self, pattern: &str) -> Option<&Resource> {
        self.routes.get(pattern).map(|route| &route.resource)
    }

    /// Full patterns in matching order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Routes in matching order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::HttpMethod;
    use crate::resource::{get, post, Resource};
    use crate::service::Scope;

    #[test]
    fn test_empty_service_is_an_error() {
        assert!(matches!(
            Service::new().flatten(),
            Err(RouterError::EmptyRouteTree)
        ));
    }

    #[test]
    fn test_first_match_wins() {
        let table = RouteTable::build(
            vec![get("/users", |_, _| "list"), get(r"/users/(?P<id>\d+)", |_, _| "one")],
            MatchMode::Prefix,
        )
        .unwrap();

        let (resource, params) = table.find("/users/42").unwrap();
        assert_eq!(resource.path(), "/users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_full_mode_lets_later_routes_match() {
        let table = RouteTable::build(
            vec![get("/users", |_, _| "list"), get(r"/users/(?P<id>\d+)", |_, _| "one")],
            MatchMode::Full,
        )
        .unwrap();

        let (resource, params) = table.find("/users/42").unwrap();
        assert_eq!(resource.path(), r"/users/(?P<id>\d+)");
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_repeated_full_pattern_keeps_first() {
        let service = Service::new()
            .service(Scope::new("/a").service(get("/b", |_, _| "scoped")).unwrap())
            .unwrap()
            .service(post("/a/b", |_, _| "root"))
            .unwrap();
        let table = RouteTable::build(service.flatten().unwrap(), MatchMode::Prefix).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("/a/b").unwrap().method(), Some(HttpMethod::Get));
    }

    #[test]
    fn test_unbound_resource_rejected() {
        let err = RouteTable::build(vec![Resource::new("/idle")], MatchMode::Prefix).unwrap_err();
        assert!(matches!(err, RouterError::UnboundResource(p) if p == "/idle"));
    }

    #[test]
    fn test_no_match() {
        let table = RouteTable::build(vec![get("/a", |_, _| "a")], MatchMode::Prefix).unwrap();
        assert!(table.find("/b").is_none());
        assert_eq!(table.patterns().collect::<Vec<_>>(), vec!["/a"]);
    }

    #[test]
    fn test_routes_keep_compiled_pattern_and_full_path() {
        let service = Service::new()
            .service(Scope::new("/api").service(get("/users", |_, _| "u")).unwrap())
            .unwrap()
            .service(post("/login", |_, _| "l"))
            .unwrap();
        let table = RouteTable::build(service.flatten().unwrap(), MatchMode::Full).unwrap();

        let routes: Vec<(&str, &str)> = table
            .iter()
            .map(|route| (route.pattern().pattern(), route.resource().path()))
            .collect();
        assert_eq!(routes, vec![("/api/users", "/api/users"), ("/login", "/login")]);
    }
}
