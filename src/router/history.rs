//! History - In-memory navigation stack with a reactive current location.
//!
//! The current location lives in a signal, so anything that reads
//! [`History::location`] inside an effect re-runs when navigation happens.
//!
//! # Example
//!
//! ```ignore
//! use spark_host::router::History;
//! use spark_signals::effect;
//!
//! let history = History::new("/");
//! let h = history.clone();
//! let _stop = effect(move || println!("now at {}", h.pathname()));
//!
//! history.push("/users?page=2"); // prints "now at /users"
//! history.back();                // prints "now at /"
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::config::HostConfig;

// =============================================================================
// Location
// =============================================================================

/// A navigable location, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    /// Always starts with `/`.
    pub pathname: String,
    /// Query string including the leading `?`, or empty.
    pub search: String,
    /// Fragment including the leading `#`, or empty.
    pub hash: String,
}

impl Location {
    /// Parse `"/path?query#hash"`.
    pub fn parse(path: &str) -> Self {
        let (rest, hash) = match path.find('#') {
            Some(i) => (&path[..i], &path[i..]),
            None => (path, ""),
        };
        let (pathname, search) = match rest.find('?') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };

        let pathname = if pathname.starts_with('/') {
            pathname.to_string()
        } else {
            format!("/{pathname}")
        };

        Self {
            pathname,
            search: if search == "?" { String::new() } else { search.to_string() },
            hash: if hash == "#" { String::new() } else { hash.to_string() },
        }
    }

    /// Full path: pathname, search and hash joined.
    pub fn href(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }
}

fn strip_basename(pathname: &str, basename: &str) -> String {
    if basename.is_empty() {
        return pathname.to_string();
    }
    let head = pathname.get(..basename.len());
    let boundary = pathname
        .get(basename.len()..)
        .unwrap_or("")
        .chars()
        .next()
        .is_none_or(|c| c == '/');

    match head {
        Some(head) if head.eq_ignore_ascii_case(basename) && boundary => {
            let rest = &pathname[basename.len()..];
            if rest.is_empty() { "/".to_string() } else { rest.to_string() }
        }
        _ => {
            tracing::warn!(pathname, basename, "path does not start with basename");
            pathname.to_string()
        }
    }
}

// =============================================================================
// History
// =============================================================================

struct HistoryState {
    entries: Vec<Location>,
    index: usize,
    basename: String,
    /// Maximum kept entries; 0 = unbounded.
    limit: usize,
}

impl HistoryState {
    fn location(&self, path: &str) -> Location {
        let mut location = Location::parse(path);
        location.pathname = strip_basename(&location.pathname, &self.basename);
        location
    }
}

/// In-memory history. Cloning yields another handle to the same stack.
#[derive(Clone)]
pub struct History {
    state: Rc<RefCell<HistoryState>>,
    current: Signal<Location>,
}

impl History {
    /// History starting at `initial`, no basename, unbounded.
    pub fn new(initial: &str) -> Self {
        Self::with_options(initial, "", 0)
    }

    /// History with a basename and an entry limit (`0` for unbounded).
    pub fn with_options(initial: &str, basename: &str, limit: usize) -> Self {
        let basename = basename.trim_end_matches('/').to_string();
        let mut state = HistoryState {
            entries: Vec::new(),
            index: 0,
            basename,
            limit,
        };
        let location = state.location(initial);
        state.entries.push(location.clone());

        Self {
            state: Rc::new(RefCell::new(state)),
            current: signal(location),
        }
    }

    pub fn from_config(config: &HostConfig) -> Self {
        Self::with_options(&config.initial_path, &config.basename, config.history_limit)
    }

    // -------------------------------------------------------------------------
    // Reading
    // -------------------------------------------------------------------------

    /// Current location. Tracked when read inside an effect.
    pub fn location(&self) -> Location {
        self.current.get()
    }

    /// Current pathname. Tracked when read inside an effect.
    pub fn pathname(&self) -> String {
        self.current.get().pathname
    }

    /// The underlying location signal.
    pub fn signal(&self) -> Signal<Location> {
        self.current.clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().entries.is_empty()
    }

    /// Position of the current entry.
    pub fn index(&self) -> usize {
        self.state.borrow().index
    }

    /// `true` if `go(delta)` would land on an existing entry.
    pub fn can_go(&self, delta: isize) -> bool {
        let state = self.state.borrow();
        let target = state.index as isize + delta;
        target >= 0 && (target as usize) < state.entries.len()
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Push a new entry, dropping any forward entries.
    pub fn push(&self, path: &str) {
        let location = {
            let mut state = self.state.borrow_mut();
            let location = state.location(path);
            let keep = state.index + 1;
            state.entries.truncate(keep);
            state.entries.push(location.clone());
            state.index = state.entries.len() - 1;

            if state.limit > 0 && state.entries.len() > state.limit {
                let excess = state.entries.len() - state.limit;
                state.entries.drain(..excess);
                state.index -= excess;
            }
            location
        };

        tracing::debug!(path = %location.href(), "history push");
        self.current.set(location);
    }

    /// Replace the current entry.
    pub fn replace(&self, path: &str) {
        let location = {
            let mut state = self.state.borrow_mut();
            let location = state.location(path);
            let index = state.index;
            state.entries[index] = location.clone();
            location
        };

        tracing::debug!(path = %location.href(), "history replace");
        self.current.set(location);
    }

    /// Move `delta` entries, clamped to the stack.
    pub fn go(&self, delta: isize) {
        let location = {
            let mut state = self.state.borrow_mut();
            let last = state.entries.len() as isize - 1;
            let target = (state.index as isize + delta).clamp(0, last) as usize;
            if target == state.index {
                return;
            }
            state.index = target;
            state.entries[target].clone()
        };

        tracing::debug!(delta, path = %location.href(), "history go");
        self.current.set(location);
    }

    pub fn back(&self) {
        self.go(-1);
    }

    pub fn forward(&self) {
        self.go(1);
    }
}

impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("History")
            .field("entries", &state.entries)
            .field("index", &state.index)
            .field("basename", &state.basename)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
