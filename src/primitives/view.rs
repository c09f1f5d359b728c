//! Views - The renderable unit every part points at.
//!
//! Anything that can render given route props is a view. Plain closures
//! work through a blanket impl; stateful components implement [`View`]
//! directly. The registry never looks at which one it was given.
//!
//! ```ignore
//! // Function view
//! let users = |props: &RouteProps<Region>| -> Cleanup {
//!     println!("user {}", props.param("id").unwrap_or("?"));
//!     noop()
//! };
//!
//! // Component view
//! struct Layout;
//!
//! impl View<Region> for Layout {
//!     fn render(&self, props: &RouteProps<Region>) -> Cleanup {
//!         let nav = props.context.mount_section(Region::Nav, SectionMode::NonExclusive);
//!         let body = props.context.mount_section(Region::Body, SectionMode::Exclusive);
//!         combine(vec![nav, body])
//!     }
//! }
//! ```

use std::any::Any;
use std::rc::Rc;

use crate::engine::{PartRegistry, Section};
use crate::router::{History, Location, RouteMatch};
use crate::state::Store;
use crate::types::{Cleanup, SectionMode, SectionName};

use super::control_flow::mount_section;

// =============================================================================
// View
// =============================================================================

/// A renderable unit.
pub trait View<S: SectionName> {
    /// Render for the given props and return how to tear it down.
    fn render(&self, props: &RouteProps<S>) -> Cleanup;
}

impl<S, F> View<S> for F
where
    S: SectionName,
    F: Fn(&RouteProps<S>) -> Cleanup,
{
    fn render(&self, props: &RouteProps<S>) -> Cleanup {
        self(props)
    }
}

// =============================================================================
// Route Props
// =============================================================================

/// What a view receives when its route guard passes.
#[derive(Clone)]
pub struct RouteProps<S: SectionName> {
    pub matched: RouteMatch,
    pub location: Location,
    pub context: ViewContext<S>,
}

impl<S: SectionName> RouteProps<S> {
    /// A route parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.matched.params.get(name).map(String::as_str)
    }
}

// =============================================================================
// View Context
// =============================================================================

/// Handles a view needs to reach the rest of the application.
///
/// Cheap to clone: every field is a shared handle.
#[derive(Clone)]
pub struct ViewContext<S: SectionName> {
    registry: PartRegistry<S>,
    history: History,
    store: Option<Rc<dyn Any>>,
}

impl<S: SectionName> ViewContext<S> {
    pub fn new(registry: PartRegistry<S>, history: History) -> Self {
        Self {
            registry,
            history,
            store: None,
        }
    }

    /// Attach the application store.
    pub fn with_store<St, A>(mut self, store: Store<St, A>) -> Self
    where
        St: Clone + PartialEq + 'static,
        A: 'static,
    {
        self.store = Some(Rc::new(store));
        self
    }

    pub fn registry(&self) -> &PartRegistry<S> {
        &self.registry
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The store, if one is attached with these state and action types.
    pub fn store<St, A>(&self) -> Option<Store<St, A>>
    where
        St: Clone + PartialEq + 'static,
        A: 'static,
    {
        self.store.as_ref()?.downcast_ref::<Store<St, A>>().cloned()
    }

    /// Push a new location.
    pub fn navigate(&self, path: &str) {
        self.history.push(path);
    }

    /// Resolve a section without rendering it.
    pub fn section(&self, name: &S, mode: impl Into<SectionMode>) -> Section<S> {
        self.registry.get_section(name, mode)
    }

    /// Mount a (usually nested) section that follows navigation.
    pub fn mount_section(&self, name: S, mode: impl Into<SectionMode>) -> Cleanup {
        mount_section(self, name, mode.into())
    }
}
