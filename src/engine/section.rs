//! Section - A resolved, route-guarded container of parts.
//!
//! A [`Section`] is built by [`PartRegistry::get_section`](super::PartRegistry::get_section).
//! The exclusivity choice is structural and made once per call:
//! - **Exclusive**: guards are evaluated in order, the first that passes
//!   renders and the rest are not evaluated
//! - **NonExclusive**: every guard is evaluated, every one that passes renders

use std::fmt;
use std::rc::Rc;

use crate::primitives::{RouteProps, ViewContext};
use crate::router::{Location, RouteMatch};
use crate::types::{combine, Cleanup, SectionMode, SectionName};

use super::part::Part;

// =============================================================================
// Route Guard
// =============================================================================

/// One part wrapped with its route guard.
pub struct RouteGuard<S: SectionName> {
    part: Rc<Part<S>>,
}

impl<S: SectionName> RouteGuard<S> {
    pub(crate) fn new(part: Rc<Part<S>>) -> Self {
        Self { part }
    }

    pub fn part(&self) -> &Rc<Part<S>> {
        &self.part
    }

    pub fn path(&self) -> &str {
        self.part.path()
    }

    pub fn exact(&self) -> bool {
        self.part.exact()
    }

    /// Evaluate the guard against `pathname`.
    pub fn check(&self, pathname: &str) -> Option<RouteMatch> {
        self.part.matches(pathname)
    }
}

impl<S: SectionName> Clone for RouteGuard<S> {
    fn clone(&self) -> Self {
        Self { part: self.part.clone() }
    }
}

/// Guards are equal when they wrap the same registered part.
impl<S: SectionName> PartialEq for RouteGuard<S> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.part, &other.part)
    }
}

impl<S: SectionName> Eq for RouteGuard<S> {}

impl<S: SectionName> fmt::Debug for RouteGuard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteGuard")
            .field("id", &self.part.id())
            .field("path", &self.path())
            .field("exact", &self.exact())
            .finish()
    }
}

// =============================================================================
// Resolved
// =============================================================================

/// A part whose guard passed, with the match it produced.
pub struct Resolved<S: SectionName> {
    pub part: Rc<Part<S>>,
    pub matched: RouteMatch,
}

impl<S: SectionName> Resolved<S> {
    /// Render the part with props built from the match.
    pub fn render(&self, context: &ViewContext<S>, location: &Location) -> Cleanup {
        let props = RouteProps {
            matched: self.matched.clone(),
            location: location.clone(),
            context: context.clone(),
        };
        self.part.render(&props)
    }
}

impl<S: SectionName> fmt::Debug for Resolved<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("part", &self.part)
            .field("matched", &self.matched)
            .finish()
    }
}

// =============================================================================
// Section
// =============================================================================

/// Ordered route guards of one section plus the rendering policy.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Section<S: SectionName> {
    name: S,
    mode: SectionMode,
    guards: Vec<RouteGuard<S>>,
}

impl<S: SectionName> Section<S> {
    pub(crate) fn new(name: S, mode: SectionMode, guards: Vec<RouteGuard<S>>) -> Self {
        Self { name, mode, guards }
    }

    pub fn name(&self) -> &S {
        &self.name
    }

    pub fn mode(&self) -> SectionMode {
        self.mode
    }

    /// Guards in registration order.
    pub fn guards(&self) -> &[RouteGuard<S>] {
        &self.guards
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// An empty section renders nothing.
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Parts that render at `pathname`, in registration order.
    ///
    /// Exclusive sections yield at most one part and stop evaluating guards
    /// at the first match.
    pub fn resolve(&self, pathname: &str) -> Vec<Resolved<S>> {
        let mut resolved = Vec::new();
        for guard in &self.guards {
            if let Some(matched) = guard.check(pathname) {
                resolved.push(Resolved {
                    part: guard.part.clone(),
                    matched,
                });
                if self.mode.is_exclusive() {
                    break;
                }
            }
        }
        resolved
    }

    /// Render the parts that match `location` once, without tracking.
    ///
    /// The returned cleanup tears them down in reverse order.
    pub fn render(&self, context: &ViewContext<S>, location: &Location) -> Cleanup {
        let cleanups = self
            .resolve(&location.pathname)
            .iter()
            .map(|resolved| resolved.render(context, location))
            .collect();
        combine(cleanups)
    }
}

// =============================================================================
// Tests
// =============================================================================
