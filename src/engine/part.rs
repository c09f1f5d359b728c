//! Part - One registration binding a route pattern to a view in a section.

use std::fmt;
use std::rc::Rc;

use crate::primitives::{RouteProps, View};
use crate::router::{RouteMatch, RoutePattern};
use crate::types::{Cleanup, SectionName};

/// A registered view. Immutable once added to a registry.
pub struct Part<S: SectionName> {
    id: usize,
    section: S,
    guard: RoutePattern,
    view: Rc<dyn View<S>>,
}

impl<S: SectionName> Part<S> {
    pub(crate) fn new(id: usize, section: S, guard: RoutePattern, view: Rc<dyn View<S>>) -> Self {
        Self {
            id,
            section,
            guard,
            view,
        }
    }

    /// Registration sequence number, unique within its registry.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn section(&self) -> &S {
        &self.section
    }

    /// The route pattern as registered.
    pub fn path(&self) -> &str {
        self.guard.source()
    }

    pub fn exact(&self) -> bool {
        self.guard.is_exact()
    }

    pub fn guard(&self) -> &RoutePattern {
        &self.guard
    }

    pub fn view(&self) -> &Rc<dyn View<S>> {
        &self.view
    }

    /// Evaluate the route guard against `pathname`.
    pub fn matches(&self, pathname: &str) -> Option<RouteMatch> {
        self.guard.matches(pathname)
    }

    /// Hand the props to the view.
    pub fn render(&self, props: &RouteProps<S>) -> Cleanup {
        self.view.render(props)
    }

    /// Same section, path and exactness.
    pub fn same_route(&self, other: &Self) -> bool {
        self.section == other.section && self.path() == other.path() && self.exact() == other.exact()
    }
}

impl<S: SectionName> fmt::Debug for Part<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Part")
            .field("id", &self.id)
            .field("section", &self.section)
            .field("path", &self.path())
            .field("exact", &self.exact())
            .finish_non_exhaustive()
    }
}
