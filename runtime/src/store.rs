//! The Store - runtime coordinator for a root reducer.
//!
//! A [`Store`] owns:
//! 1. The current state snapshot (`Rc<S>`, replaced on every reduction)
//! 2. The root reducer
//! 3. The middleware chain
//! 4. The subscriber list
//! 5. The scheduler used by delayed dispatches
//!
//! # Dispatch Loop
//!
//! ```text
//! dispatch(value)
//!   → middleware[0] → middleware[1] → ... → reduce
//!   → state cell replaced
//!   → every subscriber called, in registration order
//! ```
//!
//! No `RefCell` borrow is held while middleware, thunks or subscribers run, so
//! all of them may call back into the store.

use crate::config::StoreConfig;
use crate::metrics::{ACTIONS_TOTAL, DISPATCH_ERRORS, REDUCER_DURATION, SUBSCRIBERS_NOTIFIED};
use composable_flux_core::environment::Scheduler;
use composable_flux_core::middleware::ChainResult;
use composable_flux_core::{Action, Dispatch, Dispatched, Middleware, Next, Reducer, StoreError};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

type Listener = (u64, Rc<dyn Fn()>);
type Listeners = Rc<RefCell<Vec<Listener>>>;

/// Shared store internals
///
/// Owned by the [`Store`]; [`Dispatcher`] handles only hold a `Weak` to it.
struct Inner<R: Reducer> {
    state: RefCell<Rc<R::State>>,
    reducer: R,
    middleware: Vec<Box<dyn Middleware<R::Action>>>,
    listeners: Listeners,
    next_listener_id: Cell<u64>,
    scheduler: Rc<dyn Scheduler>,
    depth: Cell<usize>,
    config: StoreConfig,
}

/// The Store - single source of truth for one state tree
///
/// # Type Parameters
///
/// - `R`: The root reducer; fixes the state and action types
///
/// # Example
///
/// ```ignore
/// let store = Store::with_middleware(
///     FetchTodoState::default(),
///     FetchTodoReducer,
///     Rc::new(TokioScheduler::new()),
///     vec![Box::new(ThunkMiddleware)],
/// );
///
/// store.dispatch(creators.add_todo("buy milk"))?;
/// assert_eq!(store.snapshot().items.len(), 1);
/// ```
pub struct Store<R: Reducer> {
    inner: Rc<Inner<R>>,
}

impl<R> Store<R>
where
    R: Reducer + 'static,
    R::State: 'static,
    R::Action: Action + 'static,
{
    /// Create a store without middleware
    ///
    /// Deferred values dispatched to such a store fail with
    /// [`StoreError::UnhandledDeferred`].
    pub fn new(initial_state: R::State, reducer: R, scheduler: Rc<dyn Scheduler>) -> Self {
        Self::with_config(initial_state, reducer, scheduler, Vec::new(), StoreConfig::default())
    }

    /// Create a store with a middleware chain
    ///
    /// Middleware run in the order given; the first element sees every value
    /// first.
    pub fn with_middleware(
        initial_state: R::State,
        reducer: R,
        scheduler: Rc<dyn Scheduler>,
        middleware: Vec<Box<dyn Middleware<R::Action>>>,
    ) -> Self {
        Self::with_config(initial_state, reducer, scheduler, middleware, StoreConfig::default())
    }

    /// Create a store with a middleware chain and custom configuration
    pub fn with_config(
        initial_state: R::State,
        reducer: R,
        scheduler: Rc<dyn Scheduler>,
        middleware: Vec<Box<dyn Middleware<R::Action>>>,
        config: StoreConfig,
    ) -> Self {
        tracing::debug!(store = %config.name, middleware = middleware.len(), "Creating store");

        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(Rc::new(initial_state)),
                reducer,
                middleware,
                listeners: Rc::new(RefCell::new(Vec::new())),
                next_listener_id: Cell::new(0),
                scheduler,
                depth: Cell::new(0),
                config,
            }),
        }
    }

    /// The current state snapshot
    ///
    /// Cheap (one reference count increment) and free of side effects. The
    /// returned snapshot never changes; later dispatches produce new ones.
    #[must_use]
    pub fn snapshot(&self) -> Rc<R::State> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Read the current state through a closure
    ///
    /// # Example
    ///
    /// ```ignore
    /// let count = store.state(|s| s.items.len());
    /// ```
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&R::State) -> T,
    {
        f(&self.snapshot())
    }

    /// Dispatch an action or a thunk
    ///
    /// Returns `Ok(Some(action))` once an immediate action has been reduced
    /// and every subscriber notified, or `Ok(None)` when a middleware consumed
    /// the value.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UnhandledDeferred`]: a thunk reached the reducer
    /// - [`StoreError::DispatchDepthExceeded`]: nested dispatch went past
    ///   [`StoreConfig::max_dispatch_depth`]
    /// - any error a middleware or thunk returned
    pub fn dispatch(&self, action: impl Into<Dispatched<R::Action>>) -> Result<Option<R::Action>, StoreError> {
        self.inner.dispatch(action.into())
    }

    /// Register a callback run after every completed reduction
    ///
    /// Callbacks take no arguments; they read the store (or a captured
    /// snapshot source) themselves. Dropping the returned [`Subscription`]
    /// leaves the callback registered; call [`Subscription::unsubscribe`] to
    /// remove it.
    #[must_use = "call unsubscribe() to remove the callback"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));

        tracing::trace!(store = %self.inner.config.name, subscription = id, "Subscribed");

        Subscription {
            id,
            listeners: Rc::downgrade(&self.inner.listeners),
            active: Cell::new(true),
        }
    }

    /// A weak dispatch handle to this store
    ///
    /// The handle does not keep the store alive; dispatching through it after
    /// the store is dropped returns [`StoreError::StoreDropped`].
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher<R> {
        Dispatcher {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Number of registered subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// The configuration this store was built with
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }
}

impl<R> Inner<R>
where
    R: Reducer + 'static,
    R::State: 'static,
    R::Action: Action + 'static,
{
    fn dispatch(self: &Rc<Self>, action: Dispatched<R::Action>) -> ChainResult<R::Action> {
        let depth = self.depth.get();
        if depth >= self.config.max_dispatch_depth {
            ::metrics::counter!(DISPATCH_ERRORS, "reason" => "depth_exceeded").increment(1);
            tracing::warn!(
                store = %self.config.name,
                action = action.action_type(),
                depth,
                "Dispatch depth limit reached"
            );
            return Err(StoreError::DispatchDepthExceeded {
                depth: self.config.max_dispatch_depth,
            });
        }
        let _depth = DepthGuard::enter(&self.depth);

        let span = tracing::debug_span!(
            "store_dispatch",
            store = %self.config.name,
            action = action.action_type(),
            depth
        );
        let _entered = span.enter();

        ::metrics::counter!(ACTIONS_TOTAL, "type" => action.action_type()).increment(1);

        let handle = Dispatcher {
            inner: Rc::downgrade(self),
        };
        self.run_chain(0, action, &handle)
    }

    /// Pushes a value through `middleware[index..]`, then the reducer
    fn run_chain(
        self: &Rc<Self>,
        index: usize,
        action: Dispatched<R::Action>,
        handle: &Dispatcher<R>,
    ) -> ChainResult<R::Action> {
        let Some(middleware) = self.middleware.get(index) else {
            return self.reduce(action);
        };

        let forward = |action: Dispatched<R::Action>| -> ChainResult<R::Action> { self.run_chain(index + 1, action, handle) };
        middleware.handle(action, handle, Next::new(&forward))
    }

    fn reduce(&self, action: Dispatched<R::Action>) -> ChainResult<R::Action> {
        let action = match action {
            Dispatched::Immediate(action) => action,
            Dispatched::Deferred(thunk) => {
                ::metrics::counter!(DISPATCH_ERRORS, "reason" => "unhandled_deferred").increment(1);
                return Err(StoreError::UnhandledDeferred { label: thunk.label() });
            },
        };

        let start = Instant::now();
        let current = Rc::clone(&self.state.borrow());
        let next = self.reducer.reduce(&current, &action);
        *self.state.borrow_mut() = Rc::new(next);
        ::metrics::histogram!(REDUCER_DURATION).record(start.elapsed().as_secs_f64());

        tracing::debug!(action = action.action_type(), "Reduced action");

        self.notify();
        Ok(Some(action))
    }

    /// Calls every subscriber registered when notification starts
    fn notify(&self) {
        let listeners: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in &listeners {
            listener();
        }

        ::metrics::counter!(SUBSCRIBERS_NOTIFIED).increment(listeners.len() as u64);
    }
}

impl<R: Reducer> fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.inner.config.name)
            .field("middleware", &self.inner.middleware.len())
            .field("subscribers", &self.inner.listeners.borrow().len())
            .field("depth", &self.inner.depth.get())
            .finish_non_exhaustive()
    }
}

/// A weak, clonable dispatch handle
///
/// Handed to middleware and thunks, and captured by delayed continuations.
/// It re-enters the full middleware chain of its store.
pub struct Dispatcher<R: Reducer> {
    inner: Weak<Inner<R>>,
}

impl<R: Reducer> Dispatcher<R> {
    /// Returns true while the store behind this handle exists
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl<R: Reducer> Clone for Dispatcher<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<R: Reducer> fmt::Debug for Dispatcher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl<R> Dispatch<R::Action> for Dispatcher<R>
where
    R: Reducer + 'static,
    R::State: 'static,
    R::Action: Action + 'static,
{
    fn dispatch(&self, action: Dispatched<R::Action>) -> ChainResult<R::Action> {
        let inner = self.inner.upgrade().ok_or(StoreError::StoreDropped)?;
        inner.dispatch(action)
    }

    fn dispatch_after(&self, delay: Duration, action: Dispatched<R::Action>) {
        let Some(inner) = self.inner.upgrade() else {
            tracing::warn!(
                action = action.action_type(),
                "Store dropped before scheduling delayed dispatch"
            );
            return;
        };

        let handle = self.clone();
        let action_type = action.action_type();
        tracing::trace!(action = action_type, delay_ms = delay.as_millis(), "Scheduling delayed dispatch");

        inner.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Err(error) = handle.dispatch(action) {
                    tracing::warn!(action = action_type, error = %error, "Delayed dispatch failed");
                }
            }),
        );
    }
}

/// Handle returned by [`Store::subscribe`]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<Vec<Listener>>>,
    active: Cell<bool>,
}

impl Subscription {
    /// Remove the callback from its store
    ///
    /// Idempotent. A notification already in progress still calls the
    /// callback; later ones do not.
    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }

        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().retain(|(id, _)| *id != self.id);
            tracing::trace!(subscription = self.id, "Unsubscribed");
        }
    }

    /// Returns false once [`Subscription::unsubscribe`] has been called
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

/// Guard that decrements the dispatch depth on drop
struct DepthGuard<'a>(&'a Cell<usize>);

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        Self(depth)
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use composable_flux_core::Thunk;
    use composable_flux_core::environment::Task;
    use composable_flux_core::reducer::{FnReducer, from_fn};

    #[derive(Debug, Clone, PartialEq)]
    enum CounterAction {
        Add(i64),
        Noop,
    }

    impl Action for CounterAction {
        fn action_type(&self) -> &'static str {
            match self {
                Self::Add(_) => "ADD",
                Self::Noop => "NOOP",
            }
        }
    }

    type CounterReducer = FnReducer<i64, CounterAction, fn(&i64, &CounterAction) -> i64>;

    fn count(state: &i64, action: &CounterAction) -> i64 {
        match action {
            CounterAction::Add(n) => state + n,
            CounterAction::Noop => *state,
        }
    }

    fn counter_reducer() -> CounterReducer {
        from_fn(count as fn(&i64, &CounterAction) -> i64)
    }

    /// Queues tasks and runs them on demand, ignoring delays
    #[derive(Default)]
    struct QueueScheduler {
        tasks: RefCell<Vec<(Duration, Task)>>,
    }

    impl QueueScheduler {
        fn run_all(&self) {
            let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
            for (_, task) in tasks {
                task();
            }
        }
    }

    impl Scheduler for QueueScheduler {
        fn schedule(&self, delay: Duration, task: Task) {
            self.tasks.borrow_mut().push((delay, task));
        }
    }

    fn counter_store() -> (Store<CounterReducer>, Rc<QueueScheduler>) {
        let scheduler = Rc::new(QueueScheduler::default());
        let store = Store::new(0, counter_reducer(), scheduler.clone());
        (store, scheduler)
    }

    #[test]
    fn test_dispatch_reduces_and_returns_action() {
        let (store, _) = counter_store();

        let result = store.dispatch(CounterAction::Add(2)).unwrap();

        assert_eq!(result, Some(CounterAction::Add(2)));
        assert_eq!(*store.snapshot(), 2);
        assert_eq!(store.state(|n| n * 10), 20);
    }

    #[test]
    fn test_snapshot_is_stable_across_dispatch() {
        let (store, _) = counter_store();
        let before = store.snapshot();

        store.dispatch(CounterAction::Add(1)).unwrap();

        assert_eq!(*before, 0);
        assert_eq!(*store.snapshot(), 1);
    }

    #[test]
    fn test_deferred_without_thunk_middleware_is_rejected() {
        let (store, _) = counter_store();
        let thunk = Thunk::<CounterAction>::new("addLater", |_| Ok(()));

        let result = store.dispatch(thunk);

        assert_eq!(result, Err(StoreError::UnhandledDeferred { label: "addLater" }));
        assert_eq!(*store.snapshot(), 0);
    }

    #[test]
    fn test_subscribers_in_registration_order() {
        let (store, _) = counter_store();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&calls);
        let _a = store.subscribe(move || first.borrow_mut().push("first"));
        let second = Rc::clone(&calls);
        let _b = store.subscribe(move || second.borrow_mut().push("second"));

        store.dispatch(CounterAction::Noop).unwrap();

        assert_eq!(*calls.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let (store, _) = counter_store();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let subscription = store.subscribe(move || counter.set(counter.get() + 1));

        store.dispatch(CounterAction::Noop).unwrap();
        subscription.unsubscribe();
        subscription.unsubscribe();
        store.dispatch(CounterAction::Noop).unwrap();

        assert_eq!(calls.get(), 1);
        assert!(!subscription.is_active());
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_dropped_subscription_stays_registered() {
        let (store, _) = counter_store();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        drop(store.subscribe(move || counter.set(counter.get() + 1)));

        store.dispatch(CounterAction::Noop).unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn test_dispatcher_after_store_dropped() {
        let (store, scheduler) = counter_store();
        let dispatcher = store.dispatcher();
        dispatcher.dispatch_after(Duration::from_secs(1), CounterAction::Add(1).into());

        drop(store);

        assert!(!dispatcher.is_alive());
        assert_eq!(
            dispatcher.dispatch(CounterAction::Add(1).into()),
            Err(StoreError::StoreDropped)
        );
        // The scheduled continuation finds no store and does nothing
        scheduler.run_all();
    }

    #[test]
    fn test_dispatch_after_goes_through_scheduler() {
        let (store, scheduler) = counter_store();

        store
            .dispatcher()
            .dispatch_after(Duration::from_millis(5), CounterAction::Add(3).into());
        assert_eq!(*store.snapshot(), 0);

        scheduler.run_all();
        assert_eq!(*store.snapshot(), 3);
    }

    #[test]
    fn test_depth_guard_restores_depth() {
        let depth = Cell::new(0);
        {
            let _outer = DepthGuard::enter(&depth);
            let _inner = DepthGuard::enter(&depth);
            assert_eq!(depth.get(), 2);
        }
        assert_eq!(depth.get(), 0);
    }
}
