//! The dispatch capability.
//!
//! Middleware and thunks never see the store itself. They get a
//! `&dyn Dispatch<A>` that re-enters the store's full pipeline, so an action
//! dispatched from inside a thunk passes through every middleware again.

use crate::action::Dispatched;
use crate::error::StoreError;
use std::time::Duration;

/// A handle that feeds values into a store's dispatch pipeline
pub trait Dispatch<A> {
    /// Dispatch a value through the full middleware chain
    ///
    /// Returns `Ok(Some(action))` when an immediate action was reduced and
    /// `Ok(None)` when a middleware consumed the value (e.g. a thunk).
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the value could not be reduced, see the
    /// variants for the individual causes.
    fn dispatch(&self, action: Dispatched<A>) -> Result<Option<A>, StoreError>;

    /// Dispatch a value once `delay` has elapsed
    ///
    /// The continuation fires exactly once and cannot be cancelled. Errors
    /// raised when it fires are logged, not returned.
    fn dispatch_after(&self, delay: Duration, action: Dispatched<A>);
}
