use std::any::Any;

use statree_types::{PathCursor, Value};
use tracing::{debug, error};

use crate::config::RegistryConfig;
use crate::entry::{Entry, TemplateEntry};
use crate::error::{QueryError, QueryResult, RegistryError, RegistryResult};
use crate::handler::Context;
use crate::query::QueryContext;

// ---------------------------------------------------------------------------
// Default template
// ---------------------------------------------------------------------------

static STATUS_ENTRIES: [TemplateEntry; 0] = [];

static ROOT_ENTRIES: [TemplateEntry; 1] = [TemplateEntry::object("status", &STATUS_ENTRIES)];

/// The compiled-in default tree: `/` containing an empty `status` object.
pub static ROOT_TEMPLATE: TemplateEntry = TemplateEntry::object("/", &ROOT_ENTRIES);

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// An owned entry tree, extended at startup and queried afterwards.
///
/// Registration takes `&mut self` and resolution takes `&self`, so once the
/// registry is shared (for example behind an `Arc`) it can no longer be
/// extended, and concurrent queries need no locking.
#[derive(Clone, Debug)]
pub struct Registry {
    root: Entry,
    config: RegistryConfig,
}

impl Registry {
    /// A registry holding a private copy of [`ROOT_TEMPLATE`].
    pub fn new() -> Self {
        Self::with_root(ROOT_TEMPLATE.to_entry(), RegistryConfig::default())
    }

    /// A registry holding a private copy of `template`.
    ///
    /// The root's own name is never matched and is not checked; every entry
    /// below it must have a valid name unique among its siblings.
    pub fn from_template(template: &TemplateEntry, config: RegistryConfig) -> RegistryResult<Self> {
        let root = template.to_entry();
        root.validate_children()
            .inspect_err(|e| error!(root = template.name, error = %e, "invalid api template"))?;
        Ok(Self::with_root(root, config))
    }

    fn with_root(root: Entry, config: RegistryConfig) -> Self {
        Self { root, config }
    }

    /// Build the default tree and register every entry listed in `config`.
    ///
    /// Stops at the first entry that fails to register.
    pub fn from_config(config: RegistryConfig) -> RegistryResult<Self> {
        let specs = config.entries.clone();
        let mut registry = Self::with_root(ROOT_TEMPLATE.to_entry(), config);
        for spec in &specs {
            registry.register(&spec.path, spec.entry.to_entry()?)?;
        }
        Ok(registry)
    }

    pub fn root(&self) -> &Entry {
        &self.root
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Find the entry at `path`, following object children only.
    pub fn entry(&self, path: &str) -> Option<&Entry> {
        let mut cursor = PathCursor::new(path).ok()?;
        let mut node = &self.root;
        while let Some(segment) = cursor.next_segment() {
            node = node.child(segment)?;
        }
        Some(node)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Resolve `path` with no caller context.
    pub fn resolve(&self, path: &str) -> QueryResult<Value> {
        self.resolve_in(path, None)
    }

    /// Resolve `path`, handing `ctx` to every handler on the way.
    pub fn resolve_with(&self, path: &str, ctx: &dyn Any) -> QueryResult<Value> {
        self.resolve_in(path, Some(ctx))
    }

    fn resolve_in(&self, path: &str, ctx: Context<'_>) -> QueryResult<Value> {
        let mut query = QueryContext::new(path)?.with_strict_paths(self.config.strict_paths);

        match self.root.handle(&mut query, ctx) {
            Err(QueryError::Declined) => Err(query.not_found()),
            result => result,
        }
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Attach `entry` as a new child of the object at `path`.
    ///
    /// Every segment of `path` must name an object, and the parent must not
    /// already have a child called `entry.name()`. A failed registration
    /// leaves the tree unchanged.
    pub fn register(&mut self, path: &str, entry: Entry) -> RegistryResult<()> {
        self.try_register(path, entry)
            .inspect_err(|e| error!(path, error = %e, "api registration failed"))
    }

    /// Deep-copy `template` and register the copy at `path`.
    pub fn register_template(&mut self, path: &str, template: &TemplateEntry) -> RegistryResult<()> {
        self.register(path, template.to_entry())
    }

    fn try_register(&mut self, path: &str, entry: Entry) -> RegistryResult<()> {
        entry.validate()?;

        let children = children_at(&mut self.root, path)?;

        if children.iter().any(|c| c.name() == entry.name()) {
            return Err(RegistryError::AlreadyExists {
                path: path.trim_end_matches('/').to_string(),
                name: entry.name().to_string(),
            });
        }

        children
            .try_reserve(1)
            .map_err(|e| RegistryError::Alloc {
                name: entry.name().to_string(),
                reason: e.to_string(),
            })?;

        debug!(path, name = entry.name(), object = entry.is_object(), "api entry registered");
        children.push(entry);
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk `path` from `node` and return the children of the object it names.
fn children_at<'e>(mut node: &'e mut Entry, path: &str) -> RegistryResult<&'e mut Vec<Entry>> {
    let mut cursor = PathCursor::new(path)?;

    loop {
        let children = node.children_mut().ok_or_else(|| RegistryError::NotObject {
            path: path.to_string(),
        })?;

        let Some(segment) = cursor.next_segment() else {
            return Ok(children);
        };

        node = children
            .iter_mut()
            .find(|e| e.name() == segment)
            .ok_or_else(|| RegistryError::PathNotFound {
                path: path.to_string(),
            })?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{handler_fn, TypedField};

    fn workers() -> Entry {
        Entry::object("workers", vec![Entry::string("count", "4")])
    }

    fn names(registry: &Registry, path: &str) -> Vec<String> {
        registry
            .entry(path)
            .and_then(Entry::children)
            .unwrap()
            .iter()
            .map(|e| e.name().to_string())
            .collect()
    }

    #[test]
    fn default_tree_lists_empty_status() {
        let registry = Registry::new();
        let value = registry.resolve("/").unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj.get("status"), Some(&Value::empty_object()));
    }

    #[test]
    fn register_and_resolve_end_to_end() {
        let mut registry = Registry::new();
        registry.register("/status", workers()).unwrap();

        assert_eq!(
            registry.resolve("/status/workers/count").unwrap(),
            Value::string("4")
        );

        let listing = registry.resolve("/status/workers/").unwrap();
        let obj = listing.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj.get("count"), Some(&Value::string("4")));

        let err = registry.resolve("/status/workers/missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn register_at_root() {
        let mut registry = Registry::new();
        registry.register("/", Entry::string("version", "1.2")).unwrap();
        assert_eq!(names(&registry, "/"), vec!["status", "version"]);
        assert_eq!(registry.resolve("/version").unwrap(), Value::string("1.2"));
    }

    #[test]
    fn duplicate_name_is_rejected_and_tree_unchanged() {
        let mut registry = Registry::new();
        registry.register("/status", workers()).unwrap();
        registry
            .register("/status", Entry::string("uptime", "10"))
            .unwrap();

        let err = registry
            .register("/status", Entry::string("workers", "x"))
            .unwrap_err();
        match err {
            RegistryError::AlreadyExists { path, name } => {
                assert_eq!(path, "/status");
                assert_eq!(name, "workers");
            }
            other => panic!("expected AlreadyExists, got: {other}"),
        }

        assert_eq!(names(&registry, "/status"), vec!["workers", "uptime"]);
        assert!(registry.entry("/status/workers").unwrap().is_object());
    }

    #[test]
    fn register_under_string_is_rejected() {
        let mut registry = Registry::new();
        registry
            .register("/status", Entry::string("uptime", "10"))
            .unwrap();

        let err = registry
            .register("/status/uptime", Entry::string("x", "1"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotObject { .. }));

        let err = registry
            .register("/status/uptime/deeper", Entry::string("x", "1"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotObject { .. }));

        assert_eq!(names(&registry, "/status"), vec!["uptime"]);
        assert_eq!(registry.resolve("/status/uptime").unwrap(), Value::string("10"));
    }

    #[test]
    fn register_under_missing_path_is_rejected() {
        let mut registry = Registry::new();
        let err = registry
            .register("/status/nope", Entry::string("x", "1"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::PathNotFound { .. }));
        assert_eq!(names(&registry, "/"), vec!["status"]);
        assert!(names(&registry, "/status").is_empty());
    }

    #[test]
    fn register_rejects_bad_names() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.register("/status", Entry::string("", "1")),
            Err(RegistryError::Path(_))
        ));
        assert!(matches!(
            registry.register("/status", Entry::string("a/b", "1")),
            Err(RegistryError::Path(_))
        ));
        assert!(matches!(
            registry.register("status", Entry::string("ok", "1")),
            Err(RegistryError::Path(_))
        ));
        assert!(names(&registry, "/status").is_empty());
    }

    #[test]
    fn nested_registration() {
        let mut registry = Registry::new();
        registry.register("/status", workers()).unwrap();
        registry
            .register("/status/workers", Entry::string("mode", "auto"))
            .unwrap();
        assert_eq!(names(&registry, "/status/workers"), vec!["count", "mode"]);
    }

    static BUILD_ENTRIES: [TemplateEntry; 1] = [TemplateEntry::string("profile", "release")];
    static BUILD: TemplateEntry = TemplateEntry::object("build", &BUILD_ENTRIES);

    #[test]
    fn registered_template_is_copied() {
        let mut a = Registry::new();
        let mut b = Registry::new();
        a.register_template("/status", &BUILD).unwrap();
        b.register_template("/status", &BUILD).unwrap();

        a.register("/status/build", Entry::string("extra", "1")).unwrap();

        assert_eq!(names(&a, "/status/build"), vec!["profile", "extra"]);
        assert_eq!(names(&b, "/status/build"), vec!["profile"]);
        assert_eq!(BUILD.to_entry().children().unwrap().len(), 1);
    }

    #[test]
    fn dropping_registry_leaves_template_intact() {
        let registry = Registry::from_template(&ROOT_TEMPLATE, RegistryConfig::default()).unwrap();
        drop(registry);
        let again = Registry::new();
        assert!(again.resolve("/status").unwrap().is_object());
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut registry = Registry::new();
        registry.register("/status", workers()).unwrap();
        assert_eq!(registry.resolve("/").unwrap(), registry.resolve("/").unwrap());
    }

    #[test]
    fn top_level_declined_is_not_found() {
        let mut registry = Registry::new();
        registry
            .register("/", Entry::custom("hidden", handler_fn(|_q, _c| Err(QueryError::Declined))))
            .unwrap();
        assert!(registry.resolve("/hidden").unwrap_err().is_not_found());
        assert_eq!(registry.resolve("/").unwrap().as_object().unwrap().len(), 1);
    }

    #[test]
    fn strict_config_applies_to_resolve() {
        let config = RegistryConfig {
            strict_paths: true,
            ..Default::default()
        };
        let mut registry = Registry::from_template(&ROOT_TEMPLATE, config).unwrap();
        registry.register("/", Entry::string("version", "1.2")).unwrap();
        assert!(registry.resolve("/version/x").unwrap_err().is_not_found());

        let mut lenient = Registry::new();
        lenient.register("/", Entry::string("version", "1.2")).unwrap();
        assert_eq!(lenient.resolve("/version/x").unwrap(), Value::string("1.2"));
    }

    static DUP_CHILDREN: [TemplateEntry; 2] = [
        TemplateEntry::string("uptime", "1"),
        TemplateEntry::string("uptime", "2"),
    ];
    static DUP_ROOT: TemplateEntry = TemplateEntry::object("/", &DUP_CHILDREN);

    static SLASH_CHILDREN: [TemplateEntry; 1] = [TemplateEntry::string("a/b", "1")];
    static SLASH_ROOT: TemplateEntry = TemplateEntry::object("/", &SLASH_CHILDREN);

    static NESTED_BAD: [TemplateEntry; 1] = [TemplateEntry::object("status", &SLASH_CHILDREN)];
    static NESTED_ROOT: TemplateEntry = TemplateEntry::object("/", &NESTED_BAD);

    #[test]
    fn from_template_rejects_invalid_children() {
        for template in [&DUP_ROOT, &SLASH_ROOT, &NESTED_ROOT] {
            let err = Registry::from_template(template, RegistryConfig::default()).unwrap_err();
            assert!(matches!(err, RegistryError::Path(_)), "got: {err}");
        }
    }

    #[test]
    fn from_template_accepts_valid_tree() {
        let registry = Registry::from_template(&BUILD, RegistryConfig::default()).unwrap();
        assert_eq!(registry.resolve("/profile").unwrap(), Value::string("release"));
    }

    struct Instance {
        name: String,
    }

    static INSTANCE_NAME: TypedField<Instance> = TypedField::new(|i| i.name.as_str());

    #[test]
    fn same_tree_resolves_against_different_contexts() {
        let mut registry = Registry::new();
        registry
            .register("/status", Entry::field("instance", &INSTANCE_NAME))
            .unwrap();

        let first = Instance { name: "a".into() };
        let second = Instance { name: "b".into() };
        assert_eq!(
            registry.resolve_with("/status/instance", &first).unwrap(),
            Value::string("a")
        );
        assert_eq!(
            registry.resolve_with("/status/instance", &second).unwrap(),
            Value::string("b")
        );
        assert!(matches!(
            registry.resolve("/status/instance"),
            Err(QueryError::ContextMismatch { .. })
        ));
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();

        let mut registry = Registry::new();
        registry.register("/status", workers()).unwrap();
        let shared = std::sync::Arc::new(registry);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = std::sync::Arc::clone(&shared);
                std::thread::spawn(move || shared.resolve("/status/workers/count").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Value::string("4"));
        }
    }
}
