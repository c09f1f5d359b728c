//! Core types for spark-host.
//!
//! These types are shared by the registry, the router and the mount pipeline.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

// =============================================================================
// Cleanup
// =============================================================================

/// Cleanup function returned by views and mounted sections.
///
/// Call this to unmount what was rendered and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

/// A cleanup that does nothing. Handy for views with nothing to tear down.
pub fn noop() -> Cleanup {
    Box::new(|| {})
}

/// Combine several cleanups into one. They run in reverse order.
pub fn combine(cleanups: Vec<Cleanup>) -> Cleanup {
    Box::new(move || {
        for cleanup in cleanups.into_iter().rev() {
            cleanup();
        }
    })
}

// =============================================================================
// Route Params
// =============================================================================

/// Parameters extracted from a matched route pattern, keyed by name.
///
/// Unnamed wildcards are keyed by their position (`"0"`, `"1"`, ...).
pub type Params = BTreeMap<String, String>;

// =============================================================================
// Section Names
// =============================================================================

/// Identifier of a display region.
///
/// Applications usually implement this for their own enum so that only
/// known sections can be named in code. `String` implements it too, for
/// applications that prefer an open namespace.
///
/// ```ignore
/// #[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// enum Region { Main, Nav }
///
/// impl SectionName for Region {
///     fn as_str(&self) -> &str {
///         match self { Region::Main => "main", Region::Nav => "nav" }
///     }
///     fn default_section() -> Self { Region::Main }
///     fn from_name(name: &str) -> Option<Self> {
///         match name { "main" => Some(Region::Main), "nav" => Some(Region::Nav), _ => None }
///     }
/// }
/// ```
pub trait SectionName: Clone + Eq + Hash + fmt::Debug + 'static {
    /// Stable textual name, used for logging and configuration.
    fn as_str(&self) -> &str;

    /// Section used when a part is registered without one.
    fn default_section() -> Self;

    /// Parse a section from its textual name. `None` for unknown names.
    fn from_name(name: &str) -> Option<Self>;
}

/// Name of the default section for the open `String` namespace.
pub const DEFAULT_SECTION: &str = "main";

impl SectionName for String {
    fn as_str(&self) -> &str {
        self
    }

    fn default_section() -> Self {
        DEFAULT_SECTION.to_string()
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(name.to_string())
    }
}

// =============================================================================
// Section Mode
// =============================================================================

/// Rendering policy of a resolved section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionMode {
    /// Only the first part (in registration order) whose route matches renders.
    #[default]
    Exclusive,
    /// Every part whose route matches renders, in registration order.
    NonExclusive,
}

impl SectionMode {
    pub fn is_exclusive(self) -> bool {
        self == Self::Exclusive
    }
}

impl From<bool> for SectionMode {
    /// `true` is exclusive, `false` non-exclusive.
    fn from(exclusive: bool) -> Self {
        if exclusive {
            Self::Exclusive
        } else {
            Self::NonExclusive
        }
    }
}
