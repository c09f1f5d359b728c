//! Rendering Primitives - Views and reactive section mounting.
//!
//! - [`View`] - the capability every registered view satisfies
//! - [`RouteProps`] / [`ViewContext`] - what a view receives
//! - [`mount_section`] - render a section and keep it in sync with navigation
//!
//! # Lifecycle
//!
//! Rendering a view returns a [`Cleanup`](crate::types::Cleanup). Mounted
//! sections call it when the view stops matching, when the section is
//! unmounted, or when the resolved set changes.

mod control_flow;
mod view;

pub use control_flow::mount_section;
pub use view::{RouteProps, View, ViewContext};
