//! Reducer composition utilities
//!
//! A root state is a struct of independent slices. Each slice has its own
//! reducer `fn(&Slice, &Action) -> Slice`, and the root reducer calls every
//! slice reducer with the slice of the same name, then reassembles the struct.
//!
//! [`combine_reducers!`](crate::combine_reducers) generates that root reducer.
//!
//! # Example
//!
//! ```
//! use composable_flux_core::{combine_reducers, reducer::Reducer};
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! pub struct AppState {
//!     pub count: i64,
//!     pub names: Vec<String>,
//! }
//!
//! #[derive(Clone, Debug)]
//! pub enum AppAction {
//!     Increment,
//!     AddName(String),
//! }
//!
//! fn count(state: &i64, action: &AppAction) -> i64 {
//!     match action {
//!         AppAction::Increment => state + 1,
//!         AppAction::AddName(_) => *state,
//!     }
//! }
//!
//! fn names(state: &Vec<String>, action: &AppAction) -> Vec<String> {
//!     match action {
//!         AppAction::AddName(name) => {
//!             let mut next = state.clone();
//!             next.push(name.clone());
//!             next
//!         }
//!         AppAction::Increment => state.clone(),
//!     }
//! }
//!
//! combine_reducers! {
//!     /// Root reducer for `AppState`
//!     pub struct AppReducer: AppState, AppAction {
//!         count => count,
//!         names => names,
//!     }
//! }
//!
//! let state = AppReducer.reduce(&AppState::default(), &AppAction::Increment);
//! let state = AppReducer.reduce(&state, &AppAction::AddName("Alice".to_string()));
//! assert_eq!(state.count, 1);
//! assert_eq!(state.names, vec!["Alice".to_string()]);
//! ```

/// Generates a root reducer from per-slice reducers.
///
/// Every field of the state struct must be listed, each with the reducer for
/// that slice: `field => reducer`, where `reducer` is any expression callable
/// as `fn(&Slice, &Action) -> Slice`.
///
/// The generated type is a unit struct implementing
/// [`Reducer`](crate::reducer::Reducer) with the given state and action
/// types.
#[macro_export]
macro_rules! combine_reducers {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident: $state:ident, $action:ty {
            $($slice:ident => $reducer:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        $vis struct $name;

        impl $crate::reducer::Reducer for $name {
            type State = $state;
            type Action = $action;

            fn reduce(&self, state: &Self::State, action: &Self::Action) -> Self::State {
                $state {
                    $($slice: ($reducer)(&state.$slice, action),)+
                }
            }
        }
    };
}
