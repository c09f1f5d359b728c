//! Control Flow - Reactive section mounting.
//!
//! [`mount_section`] keeps a section rendered while the application
//! navigates. It is the routing counterpart of a conditional: instead of a
//! boolean condition it tracks the current location and the registry
//! revision, and instead of one branch it renders the parts the section
//! resolves to.
//!
//! # Pattern: Effect-driven Remount
//!
//! 1. An effect reads `history.location()` and `registry.revision()`
//! 2. The section is resolved against the current pathname
//! 3. The resolved set is reduced to keys (part id, matched url, params)
//! 4. Unchanged keys: nothing happens, the rendered views stay mounted
//! 5. Changed keys: previous views are cleaned up (reverse order), the new
//!    set is rendered in registration order
//!
//! Views that only care about the query string or hash should read
//! `history.location()` themselves; a change there does not remount them.
//!
//! # Nesting
//!
//! A view may call `props.context.mount_section(..)` while rendering. The
//! nested mount has its own effect and is torn down through the cleanup the
//! view returns.
//!
//! Views render detached from the mounting effect: their signal reads are
//! not tracked by it, and effects they create are not its children. A
//! re-run that keeps the same parts therefore leaves nested mounts alive.
//!
//! ```ignore
//! let layout = |props: &RouteProps<Region>| -> Cleanup {
//!     props.context.mount_section(Region::Nav, SectionMode::NonExclusive)
//! };
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use spark_signals::{effect, untrack, with_context, AnyReaction};

use crate::types::{Cleanup, Params, SectionMode, SectionName};

use super::view::ViewContext;

/// Part id, matched url and params. `is_exact` is left out so a layout
/// on `/` is not remounted when navigating to `/` itself.
type MountKey = (usize, String, Params);

/// Run `f` with no active reaction or effect.
///
/// Reads inside `f` are untracked, and effects created by `f` have no
/// parent, so re-running the caller does not destroy them.
fn detached<T>(f: impl FnOnce() -> T) -> T {
    struct Restore {
        reaction: Option<Weak<dyn AnyReaction>>,
        effect: Option<Weak<dyn AnyReaction>>,
    }

    impl Drop for Restore {
        fn drop(&mut self) {
            with_context(|ctx| {
                ctx.set_active_reaction(self.reaction.take());
                ctx.set_active_effect(self.effect.take());
            });
        }
    }

    let _restore = with_context(|ctx| Restore {
        reaction: ctx.set_active_reaction(None),
        effect: ctx.set_active_effect(None),
    });
    untrack(f)
}

fn run_all(cleanups: Vec<Cleanup>) {
    for cleanup in cleanups.into_iter().rev() {
        cleanup();
    }
}

/// Mount section `name` and keep it in sync with navigation.
///
/// # Returns
///
/// A cleanup that stops tracking and tears down whatever is rendered.
///
/// # Example
///
/// ```ignore
/// let context = ViewContext::new(registry.clone(), history.clone());
/// let cleanup = mount_section(&context, Region::Main, SectionMode::Exclusive);
///
/// history.push("/users"); // previous view cleaned up, users page rendered
///
/// cleanup();
/// ```
pub fn mount_section<S: SectionName>(context: &ViewContext<S>, name: S, mode: SectionMode) -> Cleanup {
    let context = context.clone();

    // Cleanups of the currently rendered views, in render order
    let mounted: Rc<RefCell<Vec<Cleanup>>> = Rc::new(RefCell::new(Vec::new()));
    // Keys of the currently rendered set; None before the first run
    let rendered: Rc<RefCell<Option<Vec<MountKey>>>> = Rc::new(RefCell::new(None));

    let mounted_for_effect = mounted.clone();

    let stop = effect(move || {
        // Both reads establish dependencies
        let location = context.history().location();
        let _ = context.registry().revision();

        let resolved = context
            .registry()
            .get_section(&name, mode)
            .resolve(&location.pathname);
        let keys: Vec<MountKey> = resolved
            .iter()
            .map(|r| (r.part.id(), r.matched.url.clone(), r.matched.params.clone()))
            .collect();

        if rendered.borrow().as_ref() == Some(&keys) {
            return;
        }

        // Take first, then run: a view's cleanup may touch the registry or
        // history and re-enter this effect.
        let previous: Vec<Cleanup> = mounted_for_effect.borrow_mut().drain(..).collect();
        detached(|| run_all(previous));

        tracing::debug!(
            section = name.as_str(),
            ?mode,
            pathname = %location.pathname,
            parts = ?keys.iter().map(|(id, _, _)| *id).collect::<Vec<_>>(),
            "section mounted"
        );

        let cleanups: Vec<Cleanup> = detached(|| {
            resolved
                .iter()
                .map(|r| r.render(&context, &location))
                .collect()
        });

        mounted_for_effect.borrow_mut().extend(cleanups);
        *rendered.borrow_mut() = Some(keys);
    });

    Box::new(move || {
        stop();
        let remaining: Vec<Cleanup> = mounted.borrow_mut().drain(..).collect();
        run_all(remaining);
    })
}

// =============================================================================
// Tests
// =============================================================================
