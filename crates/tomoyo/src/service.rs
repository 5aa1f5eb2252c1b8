//! Registration tree: services, scopes and their entries.

use indexmap::IndexMap;

use crate::error::{Result, RouterError};
use crate::resource::Resource;

/// A node of the registration tree.
#[derive(Debug)]
pub enum Entry {
    /// A routable resource.
    Resource(Resource),
    /// A prefixed group of entries.
    Scope(Scope),
}

impl Entry {
    /// The local path the entry is registered under.
    pub fn path(&self) -> &str {
        match self {
            Self::Resource(resource) => resource.path(),
            Self::Scope(scope) => scope.path(),
        }
    }
}

impl From<Resource> for Entry {
    fn from(resource: Resource) -> Self {
        Self::Resource(resource)
    }
}

impl From<Scope> for Entry {
    fn from(scope: Scope) -> Self {
        Self::Scope(scope)
    }
}

/// An insertion-ordered set of entries keyed by local path.
///
/// Entries are moved in on registration, so the tree can only ever be a
/// tree: a scope cannot be shared between parents or contain itself.
#[derive(Debug, Default)]
pub struct Service {
    entries: IndexMap<String, Entry>,
}

impl Service {
    /// Creates an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entry under its own path.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicatePath`] if the path is already taken
    /// in this service, whatever kind of entry holds it.
    pub fn register(&mut self, entry: impl Into<Entry>) -> Result<&mut Self> {
        let entry = entry.into();
        if self.entries.contains_key(entry.path()) {
            return Err(RouterError::DuplicatePath(entry.path().to_string()));
        }
        self.entries.insert(entry.path().to_string(), entry);
        Ok(self)
    }

    /// Registers an entry, consuming and returning the service for chaining.
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register).
    pub fn service(mut self, entry: impl Into<Entry>) -> Result<Self> {
        self.register(entry)?;
        Ok(self)
    }

    /// Number of direct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Walks the tree depth-first in registration order, emitting every
    /// resource under its full path.
    pub(crate) fn flatten_into(&self, prefix: &str, out: &mut Vec<Resource>) {
        for entry in self.entries.values() {
            match entry {
                Entry::Resource(resource) => {
                    out.push(resource.with_path(format!("{prefix}{}", resource.path())));
                }
                Entry::Scope(scope) => {
                    let nested = format!("{prefix}{}", scope.path());
                    scope.service.flatten_into(&nested, out);
                }
            }
        }
    }
}

/// A service mounted under a path prefix.
///
/// ```
/// use tomoyo::{get, Scope};
///
/// let api = Scope::new("/api")
///     .service(get("/users", |_req, _params| "users"))
///     .unwrap();
/// assert_eq!(api.path(), "/api");
/// ```
#[derive(Debug)]
pub struct Scope {
    path: String,
    service: Service,
}

impl Scope {
    /// Creates an empty scope.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            service: Service::new(),
        }
    }

    /// The prefix of this scope.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Registers an entry inside the scope.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicatePath`] on a taken local path.
    pub fn register(&mut self, entry: impl Into<Entry>) -> Result<&mut Self> {
        self.service.register(entry)?;
        Ok(self)
    }

    /// Registers an entry, consuming and returning the scope for chaining.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicatePath`] on a taken local path.
    pub fn service(mut self, entry: impl Into<Entry>) -> Result<Self> {
        self.register(entry)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::get;

    fn flatten(service: &Service) -> Vec<String> {
        let mut out = Vec::new();
        service.flatten_into("", &mut out);
        out.iter().map(|r| r.path().to_string()).collect()
    }

    #[test]
    fn test_duplicate_resource_path() {
        let mut service = Service::new();
        service.register(get("/a", |_, _| "a")).unwrap();
        let err = service.register(get("/a", |_, _| "again")).unwrap_err();
        assert!(matches!(err, RouterError::DuplicatePath(p) if p == "/a"));
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn test_duplicate_across_entry_kinds() {
        let service = Service::new().service(Scope::new("/api")).unwrap();
        let err = service.service(get("/api", |_, _| "api")).unwrap_err();
        assert!(matches!(err, RouterError::DuplicatePath(p) if p == "/api"));

        let service = Service::new().service(get("/api", |_, _| "api")).unwrap();
        assert!(service.service(Scope::new("/api")).is_err());
    }

    #[test]
    fn test_same_path_in_different_scopes() {
        let service = Service::new()
            .service(get("/users", |_, _| "root"))
            .unwrap()
            .service(Scope::new("/v1").service(get("/users", |_, _| "v1")).unwrap())
            .unwrap();
        assert_eq!(flatten(&service), vec!["/users", "/v1/users"]);
    }

    #[test]
    fn test_flatten_prefixes_every_descendant() {
        let admin = Scope::new("/admin")
            .service(get("/users", |_, _| "u"))
            .unwrap()
            .service(get("/groups", |_, _| "g"))
            .unwrap();
        let api = Scope::new("/api")
            .service(get("/status", |_, _| "s"))
            .unwrap()
            .service(admin)
            .unwrap()
            .service(get("/health", |_, _| "h"))
            .unwrap();
        let service = Service::new()
            .service(get("/", |_, _| "root"))
            .unwrap()
            .service(api)
            .unwrap()
            .service(get("/about", |_, _| "about"))
            .unwrap();

        assert_eq!(
            flatten(&service),
            vec![
                "/",
                "/api/status",
                "/api/admin/users",
                "/api/admin/groups",
                "/api/health",
                "/about",
            ]
        );
    }

    #[test]
    fn test_empty_scope_contributes_nothing() {
        let service = Service::new()
            .service(Scope::new("/empty"))
            .unwrap()
            .service(get("/x", |_, _| "x"))
            .unwrap();
        assert_eq!(flatten(&service), vec!["/x"]);
    }
}
