//! Actions and the `Dispatched` envelope.
//!
//! A store accepts two kinds of values:
//!
//! - **Immediate** actions: plain records with a type tag, handed to the reducer
//! - **Deferred** actions ([`Thunk`]): computations that receive a dispatch
//!   handle and dispatch zero or more actions, now or after a delay
//!
//! Reducers only ever see immediate actions. Deferred values must be consumed
//! by a middleware before they reach the end of the chain.

use crate::dispatch::Dispatch;
use crate::error::StoreError;
use std::fmt;

/// Marker trait for actions that can be reduced by a store
///
/// The type tag is the wire format between callers and the store: it is what
/// gets logged, counted and matched on by tooling.
///
/// Use `#[derive(Action)]` from `composable-flux-macros` to implement it for
/// an enum (tags become `SCREAMING_SNAKE_CASE` variant names).
pub trait Action: fmt::Debug {
    /// The type tag of this action, e.g. `"ADD_TODO"`
    fn action_type(&self) -> &'static str;
}

type ThunkFn<A> = Box<dyn FnOnce(&dyn Dispatch<A>) -> Result<(), StoreError>>;

/// A deferred computation that dispatches further actions
///
/// The thunk runs once, synchronously, when a thunk middleware intercepts it.
/// It may dispatch immediately through the handle, or schedule dispatches for
/// later with [`Dispatch::dispatch_after`].
///
/// # Example
///
/// ```ignore
/// let thunk = Thunk::new("fetchTodos", |dispatch| {
///     dispatch.dispatch(TodoAction::FetchTodosRequest.into())?;
///     dispatch.dispatch_after(Duration::from_secs(5), TodoAction::FetchTodosSuccess { todos }.into());
///     Ok(())
/// });
/// ```
pub struct Thunk<A> {
    label: &'static str,
    run: ThunkFn<A>,
}

impl<A> Thunk<A> {
    /// Create a new thunk
    ///
    /// The label plays the role of the type tag for logging and metrics.
    pub fn new<F>(label: &'static str, f: F) -> Self
    where
        F: FnOnce(&dyn Dispatch<A>) -> Result<(), StoreError> + 'static,
    {
        Self {
            label,
            run: Box::new(f),
        }
    }

    /// The label given at construction
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Execute the thunk with a dispatch handle
    ///
    /// # Errors
    ///
    /// Returns the first error produced by a nested dispatch, if the thunk
    /// propagates it.
    pub fn run(self, dispatch: &dyn Dispatch<A>) -> Result<(), StoreError> {
        (self.run)(dispatch)
    }
}

impl<A> fmt::Debug for Thunk<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thunk")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A value flowing through a store's dispatch pipeline
pub enum Dispatched<A> {
    /// A plain action, destined for the reducer
    Immediate(A),

    /// A deferred computation, destined for a thunk middleware
    Deferred(Thunk<A>),
}

impl<A> Dispatched<A> {
    /// Returns true for [`Dispatched::Deferred`]
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// Returns the immediate action, if this is one
    #[must_use]
    pub fn into_immediate(self) -> Option<A> {
        match self {
            Self::Immediate(action) => Some(action),
            Self::Deferred(_) => None,
        }
    }
}

impl<A: Action> Dispatched<A> {
    /// The type tag of an immediate action, or the label of a thunk
    #[must_use]
    pub fn action_type(&self) -> &'static str {
        match self {
            Self::Immediate(action) => action.action_type(),
            Self::Deferred(thunk) => thunk.label(),
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for Dispatched<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate(action) => f.debug_tuple("Dispatched::Immediate").field(action).finish(),
            Self::Deferred(thunk) => f.debug_tuple("Dispatched::Deferred").field(thunk).finish(),
        }
    }
}

impl<A: Action> From<A> for Dispatched<A> {
    fn from(action: A) -> Self {
        Self::Immediate(action)
    }
}

impl<A> From<Thunk<A>> for Dispatched<A> {
    fn from(thunk: Thunk<A>) -> Self {
        Self::Deferred(thunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Ping,
    }

    impl Action for TestAction {
        fn action_type(&self) -> &'static str {
            "PING"
        }
    }

    #[derive(Default)]
    struct RecordingDispatch {
        seen: RefCell<Vec<&'static str>>,
        delayed: RefCell<Vec<Duration>>,
    }

    impl Dispatch<TestAction> for RecordingDispatch {
        fn dispatch(&self, action: Dispatched<TestAction>) -> Result<Option<TestAction>, StoreError> {
            self.seen.borrow_mut().push(action.action_type());
            Ok(action.into_immediate())
        }

        fn dispatch_after(&self, delay: Duration, _action: Dispatched<TestAction>) {
            self.delayed.borrow_mut().push(delay);
        }
    }

    #[test]
    fn test_immediate_from_action() {
        let dispatched: Dispatched<TestAction> = TestAction::Ping.into();
        assert!(!dispatched.is_deferred());
        assert_eq!(dispatched.action_type(), "PING");
        assert_eq!(dispatched.into_immediate(), Some(TestAction::Ping));
    }

    #[test]
    fn test_thunk_label_is_action_type() {
        let dispatched: Dispatched<TestAction> = Thunk::<TestAction>::new("pingTwice", |_| Ok(())).into();
        assert!(dispatched.is_deferred());
        assert_eq!(dispatched.action_type(), "pingTwice");
        assert!(dispatched.into_immediate().is_none());
    }

    #[test]
    fn test_thunk_runs_with_handle() -> Result<(), StoreError> {
        let handle = RecordingDispatch::default();
        let thunk = Thunk::new("pingLater", |dispatch: &dyn Dispatch<TestAction>| {
            dispatch.dispatch(TestAction::Ping.into())?;
            dispatch.dispatch_after(Duration::from_millis(5), TestAction::Ping.into());
            Ok(())
        });

        thunk.run(&handle)?;

        assert_eq!(*handle.seen.borrow(), vec!["PING"]);
        assert_eq!(*handle.delayed.borrow(), vec![Duration::from_millis(5)]);
        Ok(())
    }

    #[test]
    fn test_thunk_debug_shows_label() {
        let thunk: Thunk<TestAction> = Thunk::new("noop", |_| Ok(()));
        assert!(format!("{thunk:?}").contains("noop"));
    }
}
