//! Host Pipeline
//!
//! Connects feature registration to the running application.
//!
//! # Pipeline Architecture
//!
//! ```text
//! features ──► Host (parts, reducers, middleware, effects) ──► start ──► App ──► mount
//! ```
//!
//! ## Phases
//!
//! 1. **Registration** - Features receive `&mut Host` and register what they own
//! 2. **Start** - History and store are created, views get a shared context
//! 3. **Mount** - The root section renders and follows navigation until unmounted

mod host;
mod mount;

pub use host::{feature, Feature, FnFeature, Host};
pub use mount::{App, MountHandle};
