//! Todo demos for the Composable Flux state container.
//!
//! Two variants of the classic tutorial app share one action enum and the
//! `items` / `visibility_filter` slice reducers:
//!
//! - **Fetching** ([`FetchTodoState`]): adds a `fetch_status` slice and the
//!   [`ActionCreators::fetch_todos`] thunk simulating a network round trip
//! - **Notifying** ([`NotifyTodoState`]): adds a `notifications` slice and the
//!   [`ActionCreators::add_self_hiding_notification`] thunk
//!
//! # Quick Start
//!
//! ```no_run
//! use composable_flux_runtime::TokioScheduler;
//! use std::rc::Rc;
//! use todo::{ActionCreators, TodoConfig, create_fetch_store, selectors};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scheduler = Rc::new(TokioScheduler::new());
//! let store = create_fetch_store(scheduler);
//! let creators = ActionCreators::new(&TodoConfig::default());
//!
//! store.dispatch(creators.add_todo("buy milk"))?;
//! store.dispatch(ActionCreators::toggle_todo(0))?;
//! store.dispatch(creators.fetch_todos())?;
//!
//! let state = store.snapshot();
//! println!("visible: {}", selectors::visible_todos(&*state).len());
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod config;
pub mod reducers;
pub mod selectors;
pub mod types;

use composable_flux_core::environment::Scheduler;
use composable_flux_runtime::{LoggingMiddleware, Store, StoreConfig, ThunkMiddleware};
use std::rc::Rc;

// Re-export commonly used types
pub use actions::ActionCreators;
pub use config::{ConfigError, TodoConfig};
pub use reducers::{FetchTodoReducer, NotifyTodoReducer};
pub use types::{
    FetchResponse, FetchStatus, FetchTodoState, Notification, NotifyTodoState, ParseFilterError, TodoAction,
    TodoItem, TodoSlices, VisibilityFilter,
};

/// Store of the fetching variant
pub type FetchTodoStore = Store<FetchTodoReducer>;

/// Store of the notifying variant
pub type NotifyTodoStore = Store<NotifyTodoReducer>;

/// Creates an empty store for the fetching variant
///
/// Middleware: logging, then thunks.
#[must_use]
pub fn create_fetch_store(scheduler: Rc<dyn Scheduler>) -> FetchTodoStore {
    Store::with_config(
        FetchTodoState::default(),
        FetchTodoReducer,
        scheduler,
        vec![Box::new(LoggingMiddleware), Box::new(ThunkMiddleware)],
        StoreConfig::default().with_name("fetch_todos"),
    )
}

/// Creates an empty store for the notifying variant
///
/// Middleware: logging, then thunks.
#[must_use]
pub fn create_notify_store(scheduler: Rc<dyn Scheduler>) -> NotifyTodoStore {
    Store::with_config(
        NotifyTodoState::default(),
        NotifyTodoReducer,
        scheduler,
        vec![Box::new(LoggingMiddleware), Box::new(ThunkMiddleware)],
        StoreConfig::default().with_name("notify_todos"),
    )
}
