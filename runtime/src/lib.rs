//! # Composable Flux Runtime
//!
//! Runtime implementation for the Composable Flux state container.
//!
//! This crate provides the Store that holds state, runs dispatched values
//! through the middleware chain and the root reducer, and notifies
//! subscribers.
//!
//! ## Core Components
//!
//! - **Store**: Single mutable state cell, dispatch loop and subscriber list
//! - **Dispatcher**: Weak dispatch handle given to middleware and thunks
//! - **`ThunkMiddleware`**: Executes deferred actions with the dispatch handle
//! - **`LoggingMiddleware`**: Traces every value passing through the chain
//! - **`TokioScheduler`**: Delayed continuations as tokio local tasks
//!
//! ## Threading
//!
//! A store is single-threaded (`!Send`). Dispatch, reduction and subscriber
//! notification are synchronous; the only suspension point is a delay
//! submitted to the store's [`Scheduler`](composable_flux_core::environment::Scheduler),
//! whose continuation re-enters dispatch on the same thread.
//!
//! ## Example
//!
//! ```ignore
//! use composable_flux_runtime::{Store, ThunkMiddleware, TokioScheduler};
//! use std::rc::Rc;
//!
//! let scheduler = Rc::new(TokioScheduler::new());
//! let store = Store::with_middleware(
//!     initial_state,
//!     root_reducer,
//!     scheduler.clone(),
//!     vec![Box::new(ThunkMiddleware)],
//! );
//!
//! let subscription = store.subscribe(|| println!("state changed"));
//! store.dispatch(Action::DoSomething)?;
//! let value = store.state(|s| s.some_field);
//! subscription.unsubscribe();
//! ```

/// Store configuration
pub mod config;

/// Metric names and descriptions
pub mod metrics;

/// Built-in middleware
pub mod middleware;

/// Scheduler implementations
pub mod scheduler;

/// The Store runtime
pub mod store;

pub use composable_flux_core::error::StoreError;
pub use config::StoreConfig;
pub use middleware::{LoggingMiddleware, ThunkMiddleware};
pub use scheduler::TokioScheduler;
pub use store::{Dispatcher, Store, Subscription};
