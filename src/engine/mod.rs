//! Section Engine - Part registry and section resolution.
//!
//! The engine holds the ordered registrations and answers one question:
//! which views should try to render in a given section.
//!
//! # Architecture
//!
//! ```text
//! add_part ──► PartRegistry [Part 0, Part 1, Part 2, ...]
//!                   │
//!    get_section(name, mode)   filter by section, keep order
//!                   ▼
//!             Section { mode, [RouteGuard, RouteGuard, ...] }
//!                   │
//!         resolve(pathname)    first match (exclusive) or all matches
//!                   ▼
//!             [Resolved { part, matched }, ...]
//! ```

mod part;
mod registry;
mod section;

pub use part::Part;
pub use registry::PartRegistry;
pub use section::{Resolved, RouteGuard, Section};
