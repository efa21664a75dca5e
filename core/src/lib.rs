//! # Composable Flux Core
//!
//! Core traits and types for the Composable Flux state container.
//!
//! This crate provides the abstractions for a predictable, single-threaded
//! state container in the unidirectional-data-flow style:
//!
//! - **Action**: A tagged record describing a requested state transition
//! - **Dispatched**: What flows through a store, either an immediate action or
//!   a deferred computation (a thunk) that dispatches more actions later
//! - **Reducer**: Pure function `(&State, &Action) → State`
//! - **Middleware**: Interceptors between `dispatch` and the reducer
//! - **Environment**: Injected capabilities (scheduler, id generators)
//!
//! ## Data Flow
//!
//! ```text
//! caller → dispatch → [middleware chain] → root reducer → new state → subscribers
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use composable_flux_core::{combine_reducers, reducer::Reducer};
//!
//! #[derive(Clone, Debug, Default)]
//! struct AppState {
//!     count: i64,
//!     label: String,
//! }
//!
//! combine_reducers! {
//!     /// Root reducer for `AppState`
//!     pub struct AppReducer: AppState, AppAction {
//!         count => count_reducer,
//!         label => label_reducer,
//!     }
//! }
//!
//! let next = AppReducer.reduce(&AppState::default(), &AppAction::Increment);
//! ```

/// Actions, thunks and the `Dispatched` envelope
pub mod action;

/// Reducer composition (`combine_reducers!`)
pub mod composition;

/// The dispatch capability handed to middleware and thunks
pub mod dispatch;

/// Middleware chain links
pub mod middleware;

pub use action::{Action, Dispatched, Thunk};
pub use dispatch::Dispatch;
pub use error::StoreError;
pub use middleware::{Middleware, Next};
pub use reducer::Reducer;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(&State, &Action) → State`.
///
/// They never mutate the previous state; a reducer that does not recognise an
/// action returns a value equal to its input. Slices held behind `Rc` should
/// be returned as the same `Rc` so unchanged slices stay shared between
/// snapshots.
pub mod reducer {
    use std::marker::PhantomData;

    /// The Reducer trait - pure state transition function
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for CounterReducer {
    ///     type State = i64;
    ///     type Action = CounterAction;
    ///
    ///     fn reduce(&self, state: &i64, action: &CounterAction) -> i64 {
    ///         match action {
    ///             CounterAction::Increment => state + 1,
    ///             CounterAction::Decrement => state - 1,
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer produces
        type State;

        /// The action type this reducer processes
        type Action;

        /// Compute the next state from the current state and an action
        ///
        /// Must be total: actions the reducer does not handle return the
        /// input unchanged.
        fn reduce(&self, state: &Self::State, action: &Self::Action) -> Self::State;
    }

    /// A reducer backed by a plain function or closure
    ///
    /// Created by [`from_fn`].
    pub struct FnReducer<S, A, F> {
        f: F,
        _marker: PhantomData<fn(&S, &A) -> S>,
    }

    /// Wrap a function `(&S, &A) -> S` as a [`Reducer`]
    ///
    /// # Example
    ///
    /// ```
    /// use composable_flux_core::reducer::{from_fn, Reducer};
    ///
    /// let add = from_fn(|state: &i64, delta: &i64| state + delta);
    /// assert_eq!(add.reduce(&40, &2), 42);
    /// ```
    #[must_use]
    pub const fn from_fn<S, A, F>(f: F) -> FnReducer<S, A, F>
    where
        F: Fn(&S, &A) -> S,
    {
        FnReducer {
            f,
            _marker: PhantomData,
        }
    }

    impl<S, A, F> Reducer for FnReducer<S, A, F>
    where
        F: Fn(&S, &A) -> S,
    {
        type State = S;
        type Action = A;

        fn reduce(&self, state: &S, action: &A) -> S {
            (self.f)(state, action)
        }
    }

    impl<S, A, F: Clone> Clone for FnReducer<S, A, F> {
        fn clone(&self) -> Self {
            Self {
                f: self.f.clone(),
                _marker: PhantomData,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// Everything a thunk or action creator needs from the outside world goes
/// through these traits, so tests can swap in deterministic versions.
pub mod environment {
    use std::cell::Cell;
    use std::time::Duration;

    /// A unit of work submitted to a [`Scheduler`]
    pub type Task = Box<dyn FnOnce()>;

    /// Scheduler trait - delayed execution on the store's thread
    ///
    /// A scheduled task fires exactly once after at least `delay` has passed.
    /// There is no cancellation.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - tokio local tasks
    /// let scheduler = Rc::new(TokioScheduler::new());
    ///
    /// // Test - virtual clock advanced by hand
    /// let scheduler = Rc::new(TestScheduler::new());
    /// scheduler.advance(Duration::from_secs(5));
    /// ```
    pub trait Scheduler {
        /// Run `task` once `delay` has elapsed
        fn schedule(&self, delay: Duration, task: Task);
    }

    /// IdGenerator trait - monotonic identifiers for records
    pub trait IdGenerator {
        /// Return a fresh identifier, never handed out before by this generator
        fn next_id(&self) -> i64;
    }

    /// Sequential id generator
    ///
    /// Hands out `start`, `start + 1`, ... for the lifetime of the value.
    ///
    /// # Example
    ///
    /// ```
    /// use composable_flux_core::environment::{IdGenerator, SequentialIds};
    ///
    /// let ids = SequentialIds::new();
    /// assert_eq!(ids.next_id(), 0);
    /// assert_eq!(ids.next_id(), 1);
    /// ```
    #[derive(Debug, Default)]
    pub struct SequentialIds {
        next: Cell<i64>,
    }

    impl SequentialIds {
        /// Create a generator starting at 0
        #[must_use]
        pub const fn new() -> Self {
            Self::starting_at(0)
        }

        /// Create a generator starting at `start`
        #[must_use]
        pub const fn starting_at(start: i64) -> Self {
            Self {
                next: Cell::new(start),
            }
        }

        /// The id the next call to [`IdGenerator::next_id`] will return
        #[must_use]
        pub fn peek(&self) -> i64 {
            self.next.get()
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> i64 {
            let id = self.next.get();
            self.next.set(id + 1);
            id
        }
    }
}

/// Error types shared by stores, middleware and thunks
pub mod error {
    use thiserror::Error;

    /// Errors that can occur while dispatching
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// A deferred action reached the reducer
        ///
        /// Deferred actions need a middleware that executes them (for example
        /// `ThunkMiddleware`); reducers only accept immediate actions.
        #[error("Deferred action `{label}` reached the reducer; install a thunk middleware")]
        UnhandledDeferred {
            /// Label of the thunk that was not executed
            label: &'static str,
        },

        /// Synchronous re-entrant dispatch went deeper than the configured limit
        #[error("Dispatch depth limit of {depth} exceeded")]
        DispatchDepthExceeded {
            /// The configured maximum depth
            depth: usize,
        },

        /// The store behind a dispatch handle no longer exists
        #[error("Store has been dropped")]
        StoreDropped,
    }
}
