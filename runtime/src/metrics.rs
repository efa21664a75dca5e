//! Metric names used by the runtime.
//!
//! Metrics are recorded through the `metrics` facade. Nothing is exported
//! unless the application installs a recorder; without one every call is a
//! no-op.
//!
//! # Example
//!
//! ```
//! use composable_flux_runtime::metrics::register_metrics;
//!
//! // Attach descriptions to the recorder installed by the application
//! register_metrics();
//! ```

use metrics::{Unit, describe_counter, describe_histogram};

/// Values dispatched, labelled by action `type`
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// Time spent in the root reducer
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Subscriber callbacks invoked
pub const SUBSCRIBERS_NOTIFIED: &str = "store.subscribers.notified";

/// Thunks executed by `ThunkMiddleware`, labelled by thunk `label`
pub const THUNKS_EXECUTED: &str = "store.thunks.executed";

/// Dispatches rejected with an error, labelled by `reason`
pub const DISPATCH_ERRORS: &str = "store.dispatch.errors";

/// Delayed continuations handed to a scheduler
pub const TASKS_SCHEDULED: &str = "scheduler.tasks.scheduled";

/// Register descriptions for every runtime metric
pub fn register_metrics() {
    describe_counter!(ACTIONS_TOTAL, "Values dispatched to a store, by action type");
    describe_histogram!(REDUCER_DURATION, Unit::Seconds, "Root reducer execution time");
    describe_counter!(SUBSCRIBERS_NOTIFIED, "Subscriber callbacks invoked after state changes");
    describe_counter!(THUNKS_EXECUTED, "Deferred actions executed by the thunk middleware");
    describe_counter!(DISPATCH_ERRORS, "Dispatches that returned an error, by reason");
    describe_counter!(TASKS_SCHEDULED, "Delayed dispatches submitted to a scheduler");
}
