//! # Composable Flux Testing
//!
//! Testing utilities and helpers for the Composable Flux state container.
//!
//! This crate provides:
//! - A virtual-clock [`Scheduler`](composable_flux_core::environment::Scheduler) implementation
//! - Recording middleware and subscriber probes
//! - Property-based testing utilities
//! - A Given-When-Then harness for reducers
//!
//! ## Example
//!
//! ```ignore
//! use composable_flux_testing::{ActionRecorder, TestScheduler};
//! use composable_flux_runtime::{Store, ThunkMiddleware};
//!
//! #[test]
//! fn test_fetch_flow() {
//!     let scheduler = Rc::new(TestScheduler::new());
//!     let recorder = ActionRecorder::new();
//!     let store = Store::with_middleware(
//!         FetchTodoState::default(),
//!         FetchTodoReducer,
//!         scheduler.clone(),
//!         vec![Box::new(recorder.clone()), Box::new(ThunkMiddleware)],
//!     );
//!
//!     store.dispatch(creators.fetch_todos()).unwrap();
//!     scheduler.advance(Duration::from_secs(5));
//!
//!     assert_eq!(recorder.types(), vec!["fetchTodos", "FETCH_TODOS_REQUEST", "FETCH_TODOS_SUCCESS"]);
//! }
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use composable_flux_core::environment::{Scheduler, Task};
    use std::cell::{Cell, RefCell};
    use std::cmp::{Ordering, Reverse};
    use std::collections::BinaryHeap;
    use std::fmt;
    use std::time::Duration;

    /// Scheduler with a virtual clock
    ///
    /// Nothing runs until the test advances the clock. Due tasks run in
    /// deadline order; tasks with the same deadline run in submission order.
    /// Tasks scheduled by a running task are picked up by the same
    /// [`TestScheduler::advance`] call if they fall due within it.
    ///
    /// # Example
    ///
    /// ```
    /// use composable_flux_core::environment::Scheduler;
    /// use composable_flux_testing::mocks::TestScheduler;
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use std::time::Duration;
    ///
    /// let scheduler = TestScheduler::new();
    /// let fired = Rc::new(Cell::new(false));
    /// let flag = Rc::clone(&fired);
    /// scheduler.schedule(Duration::from_secs(5), Box::new(move || flag.set(true)));
    ///
    /// scheduler.advance(Duration::from_secs(4));
    /// assert!(!fired.get());
    ///
    /// scheduler.advance(Duration::from_secs(1));
    /// assert!(fired.get());
    /// ```
    #[derive(Default)]
    pub struct TestScheduler {
        now: Cell<Duration>,
        next_seq: Cell<u64>,
        queue: RefCell<BinaryHeap<Reverse<Scheduled>>>,
    }

    struct Scheduled {
        deadline: Duration,
        seq: u64,
        task: Task,
    }

    impl PartialEq for Scheduled {
        fn eq(&self, other: &Self) -> bool {
            self.cmp(other) == Ordering::Equal
        }
    }

    impl Eq for Scheduled {}

    impl PartialOrd for Scheduled {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Scheduled {
        fn cmp(&self, other: &Self) -> Ordering {
            (self.deadline, self.seq).cmp(&(other.deadline, other.seq))
        }
    }

    impl TestScheduler {
        /// Create a scheduler with the clock at zero
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Virtual time elapsed since creation
        #[must_use]
        pub fn now(&self) -> Duration {
            self.now.get()
        }

        /// Number of tasks that have not run yet
        #[must_use]
        pub fn pending(&self) -> usize {
            self.queue.borrow().len()
        }

        /// Move the clock forward by `by`, running every task that falls due
        ///
        /// Returns the number of tasks run.
        pub fn advance(&self, by: Duration) -> usize {
            let target = self.now.get() + by;
            let mut ran = 0;

            while let Some(scheduled) = self.pop_due(Some(target)) {
                self.run(scheduled);
                ran += 1;
            }

            self.now.set(target);
            tracing::trace!(now_ms = target.as_millis(), ran, "Advanced test clock");
            ran
        }

        /// Run every pending task, moving the clock to each deadline
        ///
        /// Returns the number of tasks run.
        pub fn run_until_idle(&self) -> usize {
            let mut ran = 0;
            while let Some(scheduled) = self.pop_due(None) {
                self.run(scheduled);
                ran += 1;
            }
            ran
        }

        /// Pops the earliest task, if it is due by `limit`
        ///
        /// The queue borrow ends before the task runs, so tasks may schedule.
        fn pop_due(&self, limit: Option<Duration>) -> Option<Scheduled> {
            let mut queue = self.queue.borrow_mut();
            let due = queue
                .peek()
                .is_some_and(|Reverse(next)| limit.is_none_or(|limit| next.deadline <= limit));
            if due { queue.pop().map(|Reverse(scheduled)| scheduled) } else { None }
        }

        fn run(&self, scheduled: Scheduled) {
            if scheduled.deadline > self.now.get() {
                self.now.set(scheduled.deadline);
            }
            (scheduled.task)();
        }
    }

    impl Scheduler for TestScheduler {
        fn schedule(&self, delay: Duration, task: Task) {
            let seq = self.next_seq.get();
            self.next_seq.set(seq + 1);
            self.queue.borrow_mut().push(Reverse(Scheduled {
                deadline: self.now.get() + delay,
                seq,
                task,
            }));
        }
    }

    impl fmt::Debug for TestScheduler {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("TestScheduler")
                .field("now", &self.now.get())
                .field("pending", &self.pending())
                .finish()
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    use composable_flux_core::middleware::ChainResult;
    use composable_flux_core::{Action, Dispatch, Dispatched, Middleware, Next};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Middleware that records the tag of every value it sees
    ///
    /// Clones share one log: box one clone into the store and keep another
    /// for assertions.
    #[derive(Debug, Clone, Default)]
    pub struct ActionRecorder {
        seen: Rc<RefCell<Vec<&'static str>>>,
    }

    impl ActionRecorder {
        /// Create a recorder with an empty log
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Action tags and thunk labels, in dispatch order
        #[must_use]
        pub fn types(&self) -> Vec<&'static str> {
            self.seen.borrow().clone()
        }

        /// How many times `action_type` was seen
        #[must_use]
        pub fn count(&self, action_type: &str) -> usize {
            self.seen.borrow().iter().filter(|seen| **seen == action_type).count()
        }

        /// Empty the log
        pub fn clear(&self) {
            self.seen.borrow_mut().clear();
        }
    }

    impl<A: Action> Middleware<A> for ActionRecorder {
        fn handle(&self, action: Dispatched<A>, _dispatch: &dyn Dispatch<A>, next: Next<'_, A>) -> ChainResult<A> {
            self.seen.borrow_mut().push(action.action_type());
            next.run(action)
        }
    }

    /// Counts subscriber notifications
    ///
    /// # Example
    ///
    /// ```ignore
    /// let probe = SubscriberProbe::new();
    /// let _subscription = store.subscribe(probe.callback());
    ///
    /// store.dispatch(action)?;
    /// assert_eq!(probe.calls(), 1);
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct SubscriberProbe {
        calls: Rc<Cell<usize>>,
    }

    impl SubscriberProbe {
        /// Create a probe with no recorded calls
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// A callback suitable for `Store::subscribe`
        pub fn callback(&self) -> impl Fn() + use<> {
            let calls = Rc::clone(&self.calls);
            move || calls.set(calls.get() + 1)
        }

        /// Number of notifications received
        #[must_use]
        pub fn calls(&self) -> usize {
            self.calls.get()
        }
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use composable_flux_core::Reducer;
    use proptest::collection::vec;
    use proptest::strategy::Strategy;

    /// Sequences of up to `max_len` values drawn from `element`
    pub fn sequences<S: Strategy>(element: S, max_len: usize) -> impl Strategy<Value = Vec<S::Value>> {
        vec(element, 0..=max_len)
    }

    /// Apply `actions` to `initial` in order, returning the final state
    pub fn fold_actions<R: Reducer>(reducer: &R, initial: R::State, actions: &[R::Action]) -> R::State {
        actions
            .iter()
            .fold(initial, |state, action| reducer.reduce(&state, action))
    }
}

// Re-export commonly used items
pub use helpers::{ActionRecorder, SubscriberProbe};
pub use mocks::TestScheduler;
