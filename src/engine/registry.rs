//! Part Registry - Ordered sequence of parts, and section resolution.
//!
//! The registry is append-only:
//! - insertion order is kept and is the priority for exclusive sections
//! - parts are never updated, removed or deduplicated
//! - every `get_section` call reads the current contents (no memoization)
//!
//! A revision signal is bumped on every append, so mounted sections pick up
//! parts registered after they first rendered.

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::error::PatternError;
use crate::primitives::View;
use crate::router::{MatchFlags, RoutePattern};
use crate::types::{SectionMode, SectionName};

use super::part::Part;
use super::section::{RouteGuard, Section};

// =============================================================================
// Registry State
// =============================================================================

struct RegistryState<S: SectionName> {
    parts: Vec<Rc<Part<S>>>,
    default_section: S,
    /// Flags applied to every pattern besides `EXACT`.
    flags: MatchFlags,
    next_id: usize,
}

/// Shared handle to an ordered part registry. Clones share the same parts.
pub struct PartRegistry<S: SectionName> {
    state: Rc<RefCell<RegistryState<S>>>,
    revision: Signal<u64>,
}

impl<S: SectionName> Clone for PartRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            revision: self.revision.clone(),
        }
    }
}

impl<S: SectionName> Default for PartRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SectionName> PartRegistry<S> {
    /// Empty registry using `S::default_section()` and default matching.
    pub fn new() -> Self {
        Self::with_options(S::default_section(), MatchFlags::empty())
    }

    /// Empty registry with an explicit default section and matching flags.
    /// `MatchFlags::EXACT` is ignored here; exactness is chosen per part.
    pub fn with_options(default_section: S, flags: MatchFlags) -> Self {
        Self {
            state: Rc::new(RefCell::new(RegistryState {
                parts: Vec::new(),
                default_section,
                flags: flags - MatchFlags::EXACT,
                next_id: 0,
            })),
            revision: signal(0),
        }
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Register `view` at `path` in the default section, matching exactly.
    pub fn add_part(&self, path: &str, view: impl View<S> + 'static) -> &Self {
        let section = self.default_section();
        self.add_part_to(section, path, view, true)
    }

    /// Register `view` at `path` in `section`.
    ///
    /// Always appends. A pattern that does not compile is logged and kept
    /// as a part that never matches.
    pub fn add_part_to(&self, section: S, path: &str, view: impl View<S> + 'static, exact: bool) -> &Self {
        let flags = self.flags(exact);
        let guard = RoutePattern::compile(path, flags).unwrap_or_else(|err| {
            tracing::warn!(section = section.as_str(), path, %err, "route pattern never matches");
            RoutePattern::never(path, flags)
        });
        self.append(section, guard, Rc::new(view));
        self
    }

    /// Like [`add_part_to`](Self::add_part_to), but rejects a bad pattern
    /// instead of appending it.
    pub fn try_add_part_to(
        &self,
        section: S,
        path: &str,
        view: impl View<S> + 'static,
        exact: bool,
    ) -> Result<&Self, PatternError> {
        let guard = RoutePattern::compile(path, self.flags(exact))?;
        self.append(section, guard, Rc::new(view));
        Ok(self)
    }

    fn flags(&self, exact: bool) -> MatchFlags {
        let mut flags = self.state.borrow().flags;
        flags.set(MatchFlags::EXACT, exact);
        flags
    }

    fn append(&self, section: S, guard: RoutePattern, view: Rc<dyn View<S>>) {
        let revision = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;

            let part = Part::new(id, section, guard, view);
            if state.parts.iter().any(|existing| existing.same_route(&part)) {
                tracing::debug!(
                    section = part.section().as_str(),
                    path = part.path(),
                    exact = part.exact(),
                    "duplicate part registered"
                );
            }
            tracing::debug!(id, section = part.section().as_str(), path = part.path(), exact = part.exact(), "part added");
            state.parts.push(Rc::new(part));
            state.next_id as u64
        };

        // Written without reading, so registering from inside a render
        // does not subscribe the caller to the revision.
        self.revision.set(revision);
    }

    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------

    /// Resolve the parts of section `name`, in registration order.
    ///
    /// Never fails: a section with no parts is an empty container.
    pub fn get_section(&self, name: &S, mode: impl Into<SectionMode>) -> Section<S> {
        let mode = mode.into();
        let guards: Vec<RouteGuard<S>> = self
            .state
            .borrow()
            .parts
            .iter()
            .filter(|part| part.section() == name)
            .map(|part| RouteGuard::new(part.clone()))
            .collect();

        tracing::trace!(section = name.as_str(), ?mode, parts = guards.len(), "section resolved");
        Section::new(name.clone(), mode, guards)
    }

    /// Exclusive section `name`.
    pub fn section(&self, name: &S) -> Section<S> {
        self.get_section(name, SectionMode::Exclusive)
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    pub fn default_section(&self) -> S {
        self.state.borrow().default_section.clone()
    }

    /// All parts, in registration order.
    pub fn parts(&self) -> Vec<Rc<Part<S>>> {
        self.state.borrow().parts.clone()
    }

    /// Distinct section names, in order of first registration.
    pub fn section_names(&self) -> Vec<S> {
        let state = self.state.borrow();
        let mut names: Vec<S> = Vec::new();
        for part in &state.parts {
            if !names.contains(part.section()) {
                names.push(part.section().clone());
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.state.borrow().parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().parts.is_empty()
    }

    /// Number of parts ever appended. Tracked when read inside an effect.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// `true` if both handles share the same parts.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl<S: SectionName> std::fmt::Debug for PartRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("PartRegistry")
            .field("default_section", &state.default_section)
            .field("parts", &state.parts)
            .finish()
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

    fn view() -> impl View<String> {
        |_props: &RouteProps<String>| -> Cleanup { noop() }
    }

    fn s(name: &str) -> String {
        name.to_string()
    }

    fn paths(section: &Section<String>) -> Vec<String> {
        section.guards().iter().map(|g| g.path().to_string()).collect()
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry: PartRegistry<String> = PartRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.default_section(), "main");
        assert!(registry.get_section(&s("main"), true).is_empty());
    }

    #[test]
    fn test_add_part_defaults() {
        let registry: PartRegistry<String> = PartRegistry::new();
        registry.add_part("/a", view());

        let parts = registry.parts();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].section(), "main");
        assert_eq!(parts[0].path(), "/a");
        assert!(parts[0].exact());
    }

    #[test]
    fn test_add_part_is_chainable() {
        let registry: PartRegistry<String> = PartRegistry::new();
        let returned = registry
            .add_part("/a", view())
            .add_part_to(s("nav"), "/", view(), false)
            .add_part("/b", view());

        assert!(std::ptr::eq(returned, &registry));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_section_preserves_order_and_filters() {
        let registry: PartRegistry<String> = PartRegistry::new();
        registry
            .add_part_to(s("main"), "/3", view(), true)
            .add_part_to(s("nav"), "/x", view(), true)
            .add_part_to(s("main"), "/1", view(), true)
            .add_part_to(s("main"), "/2", view(), true);

        let main = registry.get_section(&s("main"), false);
        assert_eq!(paths(&main), vec!["/3", "/1", "/2"]);
        assert!(!main.mode().is_exclusive());

        let nav = registry.section(&s("nav"));
        assert_eq!(paths(&nav), vec!["/x"]);
        assert!(nav.mode().is_exclusive());

        assert_eq!(registry.section_names(), vec![s("main"), s("nav")]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let registry: PartRegistry<String> = PartRegistry::new();
        registry.add_part("/a", view()).add_part("/a", view());

        let section = registry.section(&s("main"));
        assert_eq!(section.len(), 2);
        assert_ne!(section.guards()[0].part().id(), section.guards()[1].part().id());
    }

    #[test]
    fn test_bad_pattern_appended_but_never_matches() {
        let registry: PartRegistry<String> = PartRegistry::new();
        registry.add_part_to(s("main"), "/users/:", view(), false);

        assert_eq!(registry.len(), 1);
        let section = registry.get_section(&s("main"), false);
        assert!(section.resolve("/users/").is_empty());
    }

    #[test]
    fn test_try_add_part_rejects_bad_pattern() {
        let registry: PartRegistry<String> = PartRegistry::new();
        assert!(registry.try_add_part_to(s("main"), "/(x)", view(), true).is_err());
        assert!(registry.is_empty());

        assert!(registry.try_add_part_to(s("main"), "/x", view(), true).is_ok());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolution_sees_later_parts() {
        let registry: PartRegistry<String> = PartRegistry::new();
        registry.add_part("/a", view());
        let before = registry.section(&s("main"));

        registry.add_part("/b", view());
        let after = registry.section(&s("main"));

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
        assert_eq!(registry.revision(), 2);
    }

    #[test]
    fn test_registry_flags_apply_to_parts() {
        let registry: PartRegistry<String> =
            PartRegistry::with_options(s("body"), MatchFlags::SENSITIVE | MatchFlags::EXACT);
        registry.add_part_to(s("body"), "/Users", view(), false);

        let part = &registry.parts()[0];
        assert!(!part.exact());
        assert!(part.guard().flags().contains(MatchFlags::SENSITIVE));
        assert!(part.matches("/users").is_none());
        assert!(part.matches("/Users/1").is_some());
    }
}
