//! State Module - The application store
//!
//! - **Store** - Reactive state, queued dispatch
//! - **StoreBuilder** - Reducers, middleware and effect handlers collected
//!   from features before the store is created

mod store;

pub use store::*;
