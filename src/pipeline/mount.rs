//! Mount API - The running application and its mounted sections.
//!
//! # Example
//!
//! ```ignore
//! let app = host.start(AppState::default());
//!
//! // Mount the root section (exclusive)
//! let handle = app.mount();
//!
//! // Navigation remounts whatever stops or starts matching
//! app.navigate("/users/42");
//!
//! // Clean up
//! handle.unmount();
//! ```

use crate::engine::PartRegistry;
use crate::primitives::{mount_section, View, ViewContext};
use crate::router::History;
use crate::state::Store;
use crate::types::{Cleanup, SectionMode, SectionName};

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by `mount` that allows unmounting.
///
/// Dropping the handle unmounts as well.
pub struct MountHandle {
    section: String,
    cleanup: Option<Cleanup>,
}

impl MountHandle {
    fn new(section: &str, cleanup: Cleanup) -> Self {
        Self {
            section: section.to_string(),
            cleanup: Some(cleanup),
        }
    }

    /// Name of the mounted section.
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Stop tracking navigation and tear down the rendered views.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            tracing::debug!(section = %self.section, "section unmounted");
            cleanup();
        }
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for MountHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountHandle")
            .field("section", &self.section)
            .field("mounted", &self.cleanup.is_some())
            .finish()
    }
}

// =============================================================================
// App
// =============================================================================

/// A started application: one registry, one history, one store.
pub struct App<Sec: SectionName, S, A> {
    context: ViewContext<Sec>,
    store: Store<S, A>,
    root: Sec,
}

impl<Sec, S, A> App<Sec, S, A>
where
    Sec: SectionName,
    S: Clone + PartialEq + 'static,
    A: 'static,
{
    pub(crate) fn new(context: ViewContext<Sec>, store: Store<S, A>, root: Sec) -> Self {
        Self { context, store, root }
    }

    /// Context handed to every view.
    pub fn context(&self) -> &ViewContext<Sec> {
        &self.context
    }

    pub fn registry(&self) -> &PartRegistry<Sec> {
        self.context.registry()
    }

    pub fn history(&self) -> &History {
        self.context.history()
    }

    pub fn store(&self) -> &Store<S, A> {
        &self.store
    }

    /// Section mounted by [`mount`](Self::mount).
    pub fn root(&self) -> &Sec {
        &self.root
    }

    pub fn navigate(&self, path: &str) {
        self.context.navigate(path);
    }

    /// Register a part after start. Mounted sections pick it up.
    pub fn add_part_to(&self, section: Sec, path: &str, view: impl View<Sec> + 'static, exact: bool) -> &Self {
        self.registry().add_part_to(section, path, view, exact);
        self
    }

    /// Mount the root section, exclusively.
    pub fn mount(&self) -> MountHandle {
        self.mount_section(self.root.clone(), SectionMode::Exclusive)
    }

    /// Mount any section.
    pub fn mount_section(&self, name: Sec, mode: impl Into<SectionMode>) -> MountHandle {
        let label = name.as_str().to_string();
        let cleanup = mount_section(&self.context, name, mode.into());
        MountHandle::new(&label, cleanup)
    }
}

// =============================================================================
// Tests
// =============================================================================
