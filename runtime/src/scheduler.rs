//! Scheduler implementations.
//!
//! [`TokioScheduler`] runs delayed continuations as local tasks on a
//! `tokio::task::LocalSet`. Tasks are `!Send` (they capture `Rc` handles to
//! the store), so they never leave the thread that created them.
//!
//! For deterministic tests use `composable_flux_testing::TestScheduler`.

use crate::metrics::TASKS_SCHEDULED;
use composable_flux_core::environment::{Scheduler, Task};
use std::cell::Cell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::LocalSet;
use tokio::time::Instant;

/// Scheduler backed by tokio timers on a [`LocalSet`]
///
/// Tasks only make progress while the set is driven, through
/// [`TokioScheduler::run_until`] or [`TokioScheduler::wait_idle`].
/// Dropping the scheduler drops the set: tasks still pending never run, and
/// the number lost is logged at `warn`.
///
/// # Example
///
/// ```ignore
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let scheduler = Rc::new(TokioScheduler::new());
///     let store = Store::with_middleware(state, reducer, scheduler.clone(), vec![Box::new(ThunkMiddleware)]);
///
///     store.dispatch(creators.fetch_todos())?;
///     scheduler.wait_idle().await; // FETCH_TODOS_SUCCESS applied here
/// }
/// ```
pub struct TokioScheduler {
    local: LocalSet,
    pending: Rc<Cell<usize>>,
    idle: Rc<Notify>,
}

impl TokioScheduler {
    /// Create a scheduler with an empty task set
    #[must_use]
    pub fn new() -> Self {
        Self {
            local: LocalSet::new(),
            pending: Rc::new(Cell::new(0)),
            idle: Rc::new(Notify::new()),
        }
    }

    /// Number of scheduled tasks that have not fired yet
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.get()
    }

    /// Drive scheduled tasks while `future` runs
    ///
    /// Returns the output of `future`; tasks still sleeping stay scheduled.
    pub async fn run_until<F: Future>(&self, future: F) -> F::Output {
        self.local.run_until(future).await
    }

    /// Drive scheduled tasks until none is pending
    ///
    /// Tasks scheduled by other tasks while waiting are waited for too.
    /// Must not be called from inside [`TokioScheduler::run_until`].
    pub async fn wait_idle(&self) {
        while self.pending.get() > 0 {
            tracing::trace!(pending = self.pending.get(), "Waiting for scheduled tasks");
            self.local.run_until(self.idle.notified()).await;
        }
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("pending", &self.pending.get())
            .finish_non_exhaustive()
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        let pending = self.pending.get();
        if pending > 0 {
            tracing::warn!(pending, "Scheduler dropped with pending tasks; they will not run");
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let deadline = Instant::now() + delay;
        let guard = PendingGuard::new(Rc::clone(&self.pending), Rc::clone(&self.idle));
        ::metrics::counter!(TASKS_SCHEDULED).increment(1);

        self.local.spawn_local(async move {
            tokio::time::sleep_until(deadline).await;
            task();
            drop(guard);
        });
    }
}

/// Guard that decrements the pending count on drop and wakes idle waiters
struct PendingGuard {
    pending: Rc<Cell<usize>>,
    idle: Rc<Notify>,
}

impl PendingGuard {
    fn new(pending: Rc<Cell<usize>>, idle: Rc<Notify>) -> Self {
        pending.set(pending.get() + 1);
        Self { pending, idle }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let remaining = self.pending.get().saturating_sub(1);
        self.pending.set(remaining);
        if remaining == 0 {
            self.idle.notify_one();
        }
    }
}
