//! # spark-host
//!
//! Section-based UI composition for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! Features register views ("parts") against named display regions
//! ("sections"), each guarded by a route pattern. A layout asks for a
//! section by name and gets back, in registration order, the parts that
//! should try to render there: the first match for an exclusive section,
//! every match otherwise.
//!
//! ```text
//! Feature::init ─► Host ─► start ─► App ─► mount_section ─► effect(location, registry) ─► views
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (Cleanup, Params, SectionName, SectionMode)
//! - [`router`] - Route patterns, history and the reactive location
//! - [`engine`] - Part registry and section resolution
//! - [`primitives`] - Views and reactive section mounting
//! - [`state`] - The application store
//! - [`pipeline`] - Host registration, start and mount
//! - [`config`] - TOML host configuration

pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod router;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::HostConfig;

pub use error::{ConfigError, HostError, PatternError};

pub use engine::{Part, PartRegistry, Resolved, RouteGuard, Section};

pub use router::{History, Location, MatchFlags, RouteMatch, RoutePattern};

pub use primitives::{mount_section, RouteProps, View, ViewContext};

pub use state::{Next, Store, StoreBuilder};

pub use pipeline::{feature, App, Feature, FnFeature, Host, MountHandle};
