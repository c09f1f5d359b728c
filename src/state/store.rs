//! Store - Application state, reducers, middleware and effect handlers.
//!
//! Features contribute to one store through a [`StoreBuilder`]:
//! - **Reducers** update state for an action, applied in registration order
//! - **Middleware** wrap dispatch; each decides whether to pass the action on
//! - **Effect handlers** run after the state for an action is published
//!
//! # Dispatch Flow
//!
//! ```text
//! dispatch(a) ─► queue ─► middleware[0] ─► middleware[1] ─► ... ─► reducers ─► publish ─► effects
//!                  ▲                                                                        │
//!                  └────────────── dispatch from middleware or effects ─────────────────────┘
//! ```
//!
//! Actions dispatched while another action is in flight are queued and run
//! after it completes, so handlers never observe half-applied state.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use spark_signals::{signal, Signal};

// =============================================================================
// Handler Types
// =============================================================================

/// Updates state in place for an action.
pub type Reducer<S, A> = Rc<dyn Fn(&mut S, &A)>;

/// Wraps dispatch. Call `next.run(action)` to continue down the chain.
pub type Middleware<S, A> = Rc<dyn Fn(&Store<S, A>, A, Next<'_, S, A>)>;

/// Runs after the state for an action has been published.
pub type EffectHandler<S, A> = Rc<dyn Fn(&Store<S, A>, &A)>;

/// The rest of the middleware chain.
pub struct Next<'a, S, A> {
    chain: &'a [Middleware<S, A>],
    store: &'a Store<S, A>,
}

impl<S, A> Next<'_, S, A>
where
    S: Clone + PartialEq + 'static,
    A: 'static,
{
    /// Pass `action` to the next middleware, or to the reducers at the end.
    pub fn run(self, action: A) {
        match self.chain.split_first() {
            Some((middleware, rest)) => middleware(
                self.store,
                action,
                Next {
                    chain: rest,
                    store: self.store,
                },
            ),
            None => self.store.reduce(action),
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects reducers, middleware and effect handlers before the store exists.
pub struct StoreBuilder<S, A> {
    reducers: Vec<(String, Reducer<S, A>)>,
    middleware: Vec<Middleware<S, A>>,
    effects: Vec<EffectHandler<S, A>>,
}

impl<S, A> Default for StoreBuilder<S, A> {
    fn default() -> Self {
        Self {
            reducers: Vec::new(),
            middleware: Vec::new(),
            effects: Vec::new(),
        }
    }
}

impl<S, A> StoreBuilder<S, A>
where
    S: Clone + PartialEq + 'static,
    A: 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named reducer. A reducer with the same name is replaced
    /// in place, keeping its original position.
    pub fn add_reducer(&mut self, name: &str, reducer: impl Fn(&mut S, &A) + 'static) -> &mut Self {
        let reducer: Reducer<S, A> = Rc::new(reducer);
        match self.reducers.iter_mut().find(|(existing, _)| existing == name) {
            Some(slot) => {
                tracing::warn!(reducer = name, "reducer replaced");
                slot.1 = reducer;
            }
            None => {
                tracing::debug!(reducer = name, "reducer added");
                self.reducers.push((name.to_string(), reducer));
            }
        }
        self
    }

    pub fn add_middleware(&mut self, middleware: impl Fn(&Store<S, A>, A, Next<'_, S, A>) + 'static) -> &mut Self {
        self.middleware.push(Rc::new(middleware));
        self
    }

    pub fn add_effect(&mut self, handler: impl Fn(&Store<S, A>, &A) + 'static) -> &mut Self {
        self.effects.push(Rc::new(handler));
        self
    }

    /// Reducer names in application order.
    pub fn reducer_names(&self) -> Vec<&str> {
        self.reducers.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Create the store with `initial` state.
    pub fn build(self, initial: S) -> Store<S, A> {
        tracing::debug!(
            reducers = self.reducers.len(),
            middleware = self.middleware.len(),
            effects = self.effects.len(),
            "store created"
        );
        Store {
            inner: Rc::new(StoreInner {
                current: RefCell::new(initial.clone()),
                state: signal(initial),
                reducers: self.reducers,
                middleware: self.middleware,
                effects: self.effects,
                queue: RefCell::new(VecDeque::new()),
                dispatching: Cell::new(false),
            }),
        }
    }
}

// =============================================================================
// Store
// =============================================================================

struct StoreInner<S, A> {
    /// Source of truth, read without tracking.
    current: RefCell<S>,
    /// Mirror of `current` for reactive readers.
    state: Signal<S>,
    reducers: Vec<(String, Reducer<S, A>)>,
    middleware: Vec<Middleware<S, A>>,
    effects: Vec<EffectHandler<S, A>>,
    queue: RefCell<VecDeque<A>>,
    dispatching: Cell<bool>,
}

/// Shared store handle. Clones dispatch to and read the same state.
pub struct Store<S, A> {
    inner: Rc<StoreInner<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Clears the dispatching flag when the loop exits, including by panic.
/// Actions queued behind a panicking one are dropped.
struct Dispatching<'a, S, A>(&'a StoreInner<S, A>);

impl<S, A> Drop for Dispatching<'_, S, A> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            if let Ok(mut queue) = self.0.queue.try_borrow_mut() {
                queue.clear();
            }
        }
        self.0.dispatching.set(false);
    }
}

impl<S, A> Store<S, A>
where
    S: Clone + PartialEq + 'static,
    A: 'static,
{
    /// Dispatch an action. Re-entrant calls are queued.
    pub fn dispatch(&self, action: A) {
        self.inner.queue.borrow_mut().push_back(action);
        if self.inner.dispatching.replace(true) {
            return;
        }
        let _guard = Dispatching(&self.inner);

        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some(action) = next else { break };
            tracing::trace!(action = std::any::type_name::<A>(), "dispatch");
            Next {
                chain: &self.inner.middleware,
                store: self,
            }
            .run(action);
        }
    }

    fn reduce(&self, action: A) {
        let next = {
            let mut state = self.inner.current.borrow().clone();
            for (_, reducer) in &self.inner.reducers {
                reducer(&mut state, &action);
            }
            state
        };

        *self.inner.current.borrow_mut() = next.clone();
        self.inner.state.set(next);

        for handler in &self.inner.effects {
            handler(self, &action);
        }
    }

    /// Current state, without tracking.
    pub fn get_state(&self) -> S {
        self.inner.current.borrow().clone()
    }

    /// Current state. Tracked when read inside an effect.
    pub fn state(&self) -> S {
        self.inner.state.get()
    }

    pub fn signal(&self) -> Signal<S> {
        self.inner.state.clone()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

// =============================================================================
// Tests
// =============================================================================
