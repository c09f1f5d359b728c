//! Router - Route guards and navigation state.
//!
//! - [`pattern`] compiles route strings and decides whether a path matches
//! - [`history`] keeps the navigation stack and the reactive current location

pub mod history;
pub mod pattern;

pub use history::{History, Location};
pub use pattern::{MatchFlags, RouteMatch, RoutePattern};
