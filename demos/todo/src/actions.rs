//! Action creators, plain and deferred.
//!
//! Plain creators build a [`TodoAction`]. Deferred creators build a
//! [`Thunk`] that a store with `ThunkMiddleware` executes.
//!
//! Id generation is owned by [`ActionCreators`] rather than by module-level
//! counters, so every session (and every test) starts from its own sequence.

use crate::config::TodoConfig;
use crate::types::{FetchResponse, TodoAction, TodoItem, VisibilityFilter};
use composable_flux_core::environment::{IdGenerator, SequentialIds};
use composable_flux_core::{Dispatch, Thunk};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Id of the record returned by the simulated server
pub const SERVER_TODO_ID: i64 = -1;

/// Text of the record returned by the simulated server
pub const SERVER_TODO_TEXT: &str = "from server";

/// The payload the simulated server answers with
#[must_use]
pub fn server_response() -> FetchResponse {
    FetchResponse {
        todos: vec![TodoItem::new(SERVER_TODO_ID, SERVER_TODO_TEXT)],
        error: None,
    }
}

/// Builds actions and thunks for one session
///
/// # Example
///
/// ```ignore
/// let creators = ActionCreators::new(&TodoConfig::default());
///
/// store.dispatch(creators.add_todo("buy milk"))?;          // id 0
/// store.dispatch(creators.add_todo("walk the dog"))?;      // id 1
/// store.dispatch(ActionCreators::toggle_todo(0))?;
/// store.dispatch(creators.fetch_todos())?;                 // thunk
/// ```
pub struct ActionCreators {
    todo_ids: Rc<dyn IdGenerator>,
    notification_ids: Rc<dyn IdGenerator>,
    fetch_delay: Duration,
    notification_ttl: Duration,
}

impl ActionCreators {
    /// Creates action creators with fresh sequential ids starting at 0
    #[must_use]
    pub fn new(config: &TodoConfig) -> Self {
        Self::with_id_generators(config, Rc::new(SequentialIds::new()), Rc::new(SequentialIds::new()))
    }

    /// Creates action creators with injected id generators
    #[must_use]
    pub fn with_id_generators(
        config: &TodoConfig,
        todo_ids: Rc<dyn IdGenerator>,
        notification_ids: Rc<dyn IdGenerator>,
    ) -> Self {
        Self {
            todo_ids,
            notification_ids,
            fetch_delay: config.fetch_delay,
            notification_ttl: config.notification_ttl,
        }
    }

    /// `ADD_TODO` with the next todo id
    #[must_use]
    pub fn add_todo(&self, text: impl Into<String>) -> TodoAction {
        TodoAction::AddTodo {
            id: self.todo_ids.next_id(),
            text: text.into(),
        }
    }

    /// `TOGGLE_TODO`
    #[must_use]
    pub const fn toggle_todo(id: i64) -> TodoAction {
        TodoAction::ToggleTodo { id }
    }

    /// `SET_VISIBILITY_FILTER`
    #[must_use]
    pub const fn set_visibility_filter(filter: VisibilityFilter) -> TodoAction {
        TodoAction::SetVisibilityFilter { filter }
    }

    /// `ADD_NOTIFICATION` with a caller-chosen id
    #[must_use]
    pub fn add_notification(text: impl Into<String>, id: i64) -> TodoAction {
        TodoAction::AddNotification { id, text: text.into() }
    }

    /// `REMOVE_NOTIFICATION`
    #[must_use]
    pub const fn remove_notification(id: i64) -> TodoAction {
        TodoAction::RemoveNotification { id }
    }

    /// `FETCH_TODOS_REQUEST`
    #[must_use]
    pub const fn fetch_todos_request() -> TodoAction {
        TodoAction::FetchTodosRequest
    }

    /// `FETCH_TODOS_FAILURE` if the response carries an error, otherwise
    /// `FETCH_TODOS_SUCCESS` with its records
    #[must_use]
    pub fn fetch_todos_response(response: FetchResponse) -> TodoAction {
        match response.error {
            Some(error) => TodoAction::FetchTodosFailure { error },
            None => TodoAction::FetchTodosSuccess { todos: response.todos },
        }
    }

    /// Simulated fetch
    ///
    /// Dispatches `FETCH_TODOS_REQUEST` right away and the server response
    /// once the fetch delay has elapsed.
    #[must_use]
    pub fn fetch_todos(&self) -> Thunk<TodoAction> {
        let delay = self.fetch_delay;

        Thunk::new("fetchTodos", move |dispatch: &dyn Dispatch<TodoAction>| {
            dispatch.dispatch(Self::fetch_todos_request().into())?;
            dispatch.dispatch_after(delay, Self::fetch_todos_response(server_response()).into());
            Ok(())
        })
    }

    /// A notification that removes itself after the notification TTL
    ///
    /// The notification id is drawn when the thunk runs.
    #[must_use]
    pub fn add_self_hiding_notification(&self, text: impl Into<String>) -> Thunk<TodoAction> {
        let ids = Rc::clone(&self.notification_ids);
        let ttl = self.notification_ttl;
        let text = text.into();

        Thunk::new("addSelfHidingNotification", move |dispatch: &dyn Dispatch<TodoAction>| {
            let id = ids.next_id();
            tracing::debug!(id, ttl_ms = ttl.as_millis(), "Showing notification");

            dispatch.dispatch(Self::add_notification(text, id).into())?;
            dispatch.dispatch_after(ttl, Self::remove_notification(id).into());
            Ok(())
        })
    }

    /// Adds an item, then announces it with a self-hiding notification
    #[must_use]
    pub fn add_todo_with_notification(&self, text: impl Into<String>) -> Thunk<TodoAction> {
        let text = text.into();
        let add = self.add_todo(text.clone());
        let announce = self.add_self_hiding_notification(format!("Added item \"{text}\""));

        Thunk::new("addTodoWithNotification", move |dispatch: &dyn Dispatch<TodoAction>| {
            dispatch.dispatch(add.into())?;
            dispatch.dispatch(announce.into())?;
            Ok(())
        })
    }
}

impl fmt::Debug for ActionCreators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCreators")
            .field("fetch_delay", &self.fetch_delay)
            .field("notification_ttl", &self.notification_ttl)
            .finish_non_exhaustive()
    }
}
