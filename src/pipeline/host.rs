//! Host - The registration phase.
//!
//! Features receive `&mut Host` and register parts, reducers, middleware
//! and effect handlers. Everything is kept in call order. `start` turns the
//! host into a running [`App`].
//!
//! # Example
//!
//! ```ignore
//! type AppHost = Host<Region, AppState, Action>;
//!
//! let users = feature("users", |host: &mut AppHost| {
//!     host.add_part_to(Region::Nav, "/users", users_link, false)
//!         .add_part_to(Region::Main, "/users/:id?", users_page, true)
//!         .add_reducer("users", users_reducer);
//! });
//!
//! let mut host = AppHost::with_config(config)?;
//! host.install_all(vec![Box::new(home) as Box<dyn Feature<_, _, _>>, Box::new(users)]);
//! let app = host.start(AppState::default());
//! let handle = app.mount();
//! ```

use crate::config::HostConfig;
use crate::engine::{PartRegistry, Section};
use crate::error::{HostError, PatternError};
use crate::primitives::{View, ViewContext};
use crate::router::History;
use crate::state::{Next, Store, StoreBuilder};
use crate::types::{SectionMode, SectionName};

use super::mount::App;

// =============================================================================
// Feature
// =============================================================================

/// A feature module: a named initializer run against the host.
pub trait Feature<Sec: SectionName, S, A> {
    /// Unique name. A second feature with the same name is not installed.
    fn name(&self) -> &str;

    fn init(&self, host: &mut Host<Sec, S, A>);
}

impl<Sec: SectionName, S, A, T> Feature<Sec, S, A> for Box<T>
where
    T: Feature<Sec, S, A> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn init(&self, host: &mut Host<Sec, S, A>) {
        (**self).init(host)
    }
}

/// Feature backed by a closure. Built with [`feature`].
pub struct FnFeature<F> {
    name: String,
    init: F,
}

/// Wrap a closure as a named feature.
pub fn feature<F>(name: &str, init: F) -> FnFeature<F> {
    FnFeature {
        name: name.to_string(),
        init,
    }
}

impl<Sec, S, A, F> Feature<Sec, S, A> for FnFeature<F>
where
    Sec: SectionName,
    F: Fn(&mut Host<Sec, S, A>),
{
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&self, host: &mut Host<Sec, S, A>) {
        (self.init)(host)
    }
}

// =============================================================================
// Host
// =============================================================================

/// Collects every registration before the application starts.
pub struct Host<Sec: SectionName, S, A> {
    config: HostConfig,
    root: Sec,
    parts: PartRegistry<Sec>,
    store: StoreBuilder<S, A>,
    installed: Vec<String>,
}

impl<Sec, S, A> Default for Host<Sec, S, A>
where
    Sec: SectionName,
    S: Clone + PartialEq + 'static,
    A: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Sec, S, A> Host<Sec, S, A>
where
    Sec: SectionName,
    S: Clone + PartialEq + 'static,
    A: 'static,
{
    /// Host with the default configuration.
    pub fn new() -> Self {
        Self {
            config: HostConfig::default(),
            root: Sec::default_section(),
            parts: PartRegistry::new(),
            store: StoreBuilder::new(),
            installed: Vec::new(),
        }
    }

    /// Host with `config`. Section names in the config must be known to `Sec`.
    pub fn with_config(config: HostConfig) -> Result<Self, HostError> {
        let default_section = config.default_section::<Sec>()?;
        let root = config.root_section::<Sec>()?;
        let parts = PartRegistry::with_options(default_section, config.match_flags());

        Ok(Self {
            config,
            root,
            parts,
            store: StoreBuilder::new(),
            installed: Vec::new(),
        })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn registry(&self) -> &PartRegistry<Sec> {
        &self.parts
    }

    // -------------------------------------------------------------------------
    // Parts
    // -------------------------------------------------------------------------

    /// Register `view` at `path` in the default section, matching exactly.
    pub fn add_part(&mut self, path: &str, view: impl View<Sec> + 'static) -> &mut Self {
        self.parts.add_part(path, view);
        self
    }

    /// Register `view` at `path` in `section`.
    pub fn add_part_to(&mut self, section: Sec, path: &str, view: impl View<Sec> + 'static, exact: bool) -> &mut Self {
        self.parts.add_part_to(section, path, view, exact);
        self
    }

    /// Register a part, rejecting a pattern that does not compile.
    pub fn try_add_part_to(
        &mut self,
        section: Sec,
        path: &str,
        view: impl View<Sec> + 'static,
        exact: bool,
    ) -> Result<&mut Self, PatternError> {
        self.parts.try_add_part_to(section, path, view, exact)?;
        Ok(self)
    }

    /// Resolve a section against the parts registered so far.
    pub fn get_section(&self, name: &Sec, mode: impl Into<SectionMode>) -> Section<Sec> {
        self.parts.get_section(name, mode)
    }

    // -------------------------------------------------------------------------
    // Store
    // -------------------------------------------------------------------------

    pub fn add_reducer(&mut self, name: &str, reducer: impl Fn(&mut S, &A) + 'static) -> &mut Self {
        self.store.add_reducer(name, reducer);
        self
    }

    pub fn add_middleware(&mut self, middleware: impl Fn(&Store<S, A>, A, Next<'_, S, A>) + 'static) -> &mut Self {
        self.store.add_middleware(middleware);
        self
    }

    pub fn add_effect(&mut self, handler: impl Fn(&Store<S, A>, &A) + 'static) -> &mut Self {
        self.store.add_effect(handler);
        self
    }

    // -------------------------------------------------------------------------
    // Features
    // -------------------------------------------------------------------------

    /// Run a feature's initializer now.
    pub fn install(&mut self, feature: impl Feature<Sec, S, A>) -> &mut Self {
        self.run_feature(&feature);
        self
    }

    /// Run initializers in the order given.
    pub fn install_all<I>(&mut self, features: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Feature<Sec, S, A>,
    {
        for feature in features {
            self.run_feature(&feature);
        }
        self
    }

    fn run_feature(&mut self, feature: &dyn Feature<Sec, S, A>) {
        let name = feature.name().to_string();
        if self.installed.contains(&name) {
            tracing::warn!(feature = %name, "feature already installed, skipping");
            return;
        }

        let before = self.parts.len();
        feature.init(self);
        tracing::debug!(feature = %name, parts = self.parts.len() - before, "feature installed");
        self.installed.push(name);
    }

    /// Names of installed features, in install order.
    pub fn installed(&self) -> &[String] {
        &self.installed
    }

    // -------------------------------------------------------------------------
    // Start
    // -------------------------------------------------------------------------

    /// Create the store and history and hand back the running application.
    pub fn start(self, initial_state: S) -> App<Sec, S, A> {
        let history = History::from_config(&self.config);
        let store = self.store.build(initial_state);
        let context = ViewContext::new(self.parts, history).with_store(store.clone());

        tracing::info!(
            features = self.installed.len(),
            parts = context.registry().len(),
            root = self.root.as_str(),
            path = %context.history().pathname(),
            "host started"
        );
        App::new(context, store, self.root)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::RouteProps;
    use crate::types::{noop, Cleanup};
    use std::cell::RefCell;
    use std::rc::Rc;

    type TestHost = Host<String, i32, i32>;

    fn view() -> impl View<String> {
        |_props: &RouteProps<String>| -> Cleanup { noop() }
    }

    #[test]
    fn test_add_part_returns_same_host() {
        let mut host = TestHost::new();
        let ptr: *const TestHost = &host;
        let returned: *const TestHost = host.add_part("/a", view()).add_part("/b", view());

        assert!(std::ptr::eq(ptr, returned));
        assert_eq!(host.registry().len(), 2);
    }

    #[test]
    fn test_features_run_in_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut host = TestHost::new();

        let features: Vec<Box<dyn Feature<String, i32, i32>>> = ["b", "a", "c"]
            .into_iter()
            .map(|name| {
                let order = order.clone();
                Box::new(feature(name, move |host: &mut TestHost| {
                    order.borrow_mut().push(name);
                    host.add_part(&format!("/{name}"), view());
                })) as Box<dyn Feature<String, i32, i32>>
            })
            .collect();

        host.install_all(features);
        assert_eq!(*order.borrow(), vec!["b", "a", "c"]);
        assert_eq!(host.installed(), ["b", "a", "c"]);

        let paths: Vec<String> = host
            .get_section(&"main".to_string(), false)
            .guards()
            .iter()
            .map(|g| g.path().to_string())
            .collect();
        assert_eq!(paths, vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn test_duplicate_feature_skipped() {
        let runs = Rc::new(RefCell::new(0));
        let mut host = TestHost::new();

        for _ in 0..2 {
            let runs = runs.clone();
            host.install(feature("users", move |_: &mut TestHost| *runs.borrow_mut() += 1));
        }
        assert_eq!(*runs.borrow(), 1);
        assert_eq!(host.installed().len(), 1);
    }

    #[test]
    fn test_with_config_rejects_unknown_section() {
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        struct OnlyMain;

        impl SectionName for OnlyMain {
            fn as_str(&self) -> &str {
                "main"
            }

            fn default_section() -> Self {
                OnlyMain
            }

            fn from_name(name: &str) -> Option<Self> {
                (name == "main").then_some(OnlyMain)
            }
        }

        let config = HostConfig {
            default_section: Some("nav".to_string()),
            ..Default::default()
        };
        let result = Host::<OnlyMain, i32, i32>::with_config(config);
        assert!(matches!(result, Err(HostError::UnknownSection(name)) if name == "nav"));
    }

    #[test]
    fn test_with_config_sets_default_section() {
        let config = HostConfig {
            default_section: Some("body".to_string()),
            ..Default::default()
        };
        let mut host = Host::<String, i32, i32>::with_config(config).unwrap();
        host.add_part("/x", view());

        assert_eq!(host.get_section(&"body".to_string(), true).len(), 1);
        assert!(host.get_section(&"main".to_string(), true).is_empty());
    }

    #[test]
    fn test_store_registrations_reach_store() {
        let mut host = TestHost::new();
        host.add_reducer("sum", |state: &mut i32, action: &i32| *state += action)
            .add_middleware(|_store: &Store<i32, i32>, action: i32, next: Next<'_, i32, i32>| next.run(action * 2));

        let app = host.start(1);
        app.store().dispatch(5);
        assert_eq!(app.store().get_state(), 11);
    }
}
