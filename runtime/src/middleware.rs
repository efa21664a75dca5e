//! Built-in middleware.
//!
//! - [`ThunkMiddleware`]: executes deferred actions
//! - [`LoggingMiddleware`]: traces every value passing through the chain
//!
//! Order matters. A `LoggingMiddleware` placed before the thunk middleware
//! sees thunk labels as well as action tags; placed after it, only the
//! immediate actions that reach the reducer.

use crate::metrics::THUNKS_EXECUTED;
use composable_flux_core::middleware::ChainResult;
use composable_flux_core::{Action, Dispatch, Dispatched, Middleware, Next};

/// Executes [`Dispatched::Deferred`] values
///
/// A thunk is run synchronously with the store's dispatch handle and is not
/// forwarded; the dispatch that carried it returns `Ok(None)`. Immediate
/// actions pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThunkMiddleware;

impl<A> Middleware<A> for ThunkMiddleware {
    fn handle(&self, action: Dispatched<A>, dispatch: &dyn Dispatch<A>, next: Next<'_, A>) -> ChainResult<A> {
        match action {
            Dispatched::Deferred(thunk) => {
                let label = thunk.label();
                tracing::trace!(thunk = label, "Running thunk");
                ::metrics::counter!(THUNKS_EXECUTED, "label" => label).increment(1);

                thunk.run(dispatch)?;
                Ok(None)
            },
            immediate @ Dispatched::Immediate(_) => next.run(immediate),
        }
    }
}

/// Traces each value before and after the rest of the chain runs
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

impl<A: Action> Middleware<A> for LoggingMiddleware {
    fn handle(&self, action: Dispatched<A>, _dispatch: &dyn Dispatch<A>, next: Next<'_, A>) -> ChainResult<A> {
        let action_type = action.action_type();
        let deferred = action.is_deferred();
        tracing::trace!(action = action_type, deferred, "Dispatching");

        let result = next.run(action);

        match &result {
            Ok(Some(_)) => tracing::trace!(action = action_type, "Reduced"),
            Ok(None) => tracing::trace!(action = action_type, "Consumed by middleware"),
            Err(error) => tracing::debug!(action = action_type, error = %error, "Dispatch failed"),
        }

        result
    }
}
