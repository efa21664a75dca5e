//! Middleware chain links.
//!
//! A middleware sits between `dispatch` and the root reducer. Each link
//! receives the dispatched value, the store's dispatch handle and a [`Next`]
//! that forwards to the remaining links. The last link is the reducer.
//!
//! ```text
//! dispatch(value) → m[0].handle → m[1].handle → ... → reducer
//! ```
//!
//! A middleware may:
//! - forward the value unchanged (`next.run(action)`)
//! - consume it and return `Ok(None)` (what a thunk middleware does)
//! - dispatch other values through the handle, re-entering the chain at `m[0]`

use crate::action::Dispatched;
use crate::dispatch::Dispatch;
use crate::error::StoreError;

/// Result of pushing a value through (part of) the chain
pub type ChainResult<A> = Result<Option<A>, StoreError>;

/// Middleware trait - intercepts values before they reach the reducer
///
/// # Example
///
/// ```ignore
/// struct CountingMiddleware(Cell<usize>);
///
/// impl<A> Middleware<A> for CountingMiddleware {
///     fn handle(&self, action: Dispatched<A>, _dispatch: &dyn Dispatch<A>, next: Next<'_, A>) -> ChainResult<A> {
///         self.0.set(self.0.get() + 1);
///         next.run(action)
///     }
/// }
/// ```
pub trait Middleware<A> {
    /// Handle a dispatched value
    ///
    /// # Errors
    ///
    /// Returns any [`StoreError`] produced further down the chain or by
    /// nested dispatches.
    fn handle(&self, action: Dispatched<A>, dispatch: &dyn Dispatch<A>, next: Next<'_, A>) -> ChainResult<A>;
}

/// The remainder of a middleware chain
///
/// Consumed by [`Next::run`], so a middleware forwards a value at most once.
pub struct Next<'a, A> {
    forward: &'a dyn Fn(Dispatched<A>) -> ChainResult<A>,
}

impl<'a, A> Next<'a, A> {
    /// Wrap the function that runs the rest of the chain
    #[must_use]
    pub const fn new(forward: &'a dyn Fn(Dispatched<A>) -> ChainResult<A>) -> Self {
        Self { forward }
    }

    /// Forward a value to the next link
    ///
    /// # Errors
    ///
    /// Returns whatever the remaining chain returns.
    pub fn run(self, action: Dispatched<A>) -> ChainResult<A> {
        (self.forward)(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use std::cell::Cell;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    struct Tick;

    impl Action for Tick {
        fn action_type(&self) -> &'static str {
            "TICK"
        }
    }

    struct NoopDispatch;

    impl Dispatch<Tick> for NoopDispatch {
        fn dispatch(&self, action: Dispatched<Tick>) -> ChainResult<Tick> {
            Ok(action.into_immediate())
        }

        fn dispatch_after(&self, _delay: Duration, _action: Dispatched<Tick>) {}
    }

    struct Counting(Cell<usize>);

    impl Middleware<Tick> for Counting {
        fn handle(&self, action: Dispatched<Tick>, _dispatch: &dyn Dispatch<Tick>, next: Next<'_, Tick>) -> ChainResult<Tick> {
            self.0.set(self.0.get() + 1);
            next.run(action)
        }
    }

    struct Swallow;

    impl Middleware<Tick> for Swallow {
        fn handle(&self, _action: Dispatched<Tick>, _dispatch: &dyn Dispatch<Tick>, _next: Next<'_, Tick>) -> ChainResult<Tick> {
            Ok(None)
        }
    }

    #[test]
    fn test_forwarding_reaches_end_of_chain() -> Result<(), StoreError> {
        let counting = Counting(Cell::new(0));
        let reached = Cell::new(false);
        let end = |action: Dispatched<Tick>| -> ChainResult<Tick> {
            reached.set(true);
            Ok(action.into_immediate())
        };

        let result = counting.handle(Tick.into(), &NoopDispatch, Next::new(&end))?;

        assert_eq!(result, Some(Tick));
        assert_eq!(counting.0.get(), 1);
        assert!(reached.get());
        Ok(())
    }

    #[test]
    fn test_swallowing_stops_chain() -> Result<(), StoreError> {
        let reached = Cell::new(false);
        let end = |action: Dispatched<Tick>| -> ChainResult<Tick> {
            reached.set(true);
            Ok(action.into_immediate())
        };

        let result = Swallow.handle(Tick.into(), &NoopDispatch, Next::new(&end))?;

        assert_eq!(result, None);
        assert!(!reached.get());
        Ok(())
    }
}
