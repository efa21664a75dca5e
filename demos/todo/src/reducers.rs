//! Slice reducers and the two root reducers.
//!
//! Each slice reducer is a plain function `(&Slice, &TodoAction) -> Slice`.
//! List slices are returned as the same `Rc` when an action does not concern
//! them, so untouched slices stay shared between snapshots.

use crate::types::{FetchStatus, FetchTodoState, Notification, NotifyTodoState, TodoAction, TodoItem, VisibilityFilter};
use composable_flux_core::combine_reducers;
use std::rc::Rc;

/// Todo items
///
/// - `ADD_TODO` appends a new, not completed item (ids are not checked)
/// - `TOGGLE_TODO` flips `completed` on the matching item
/// - `FETCH_TODOS_SUCCESS` replaces items whose id matches a fetched record,
///   in place, and appends records with new ids
///
/// Records are held by value: an action that changes the list copies every
/// record into the new `Vec`, touched or not.
pub fn items(state: &Rc<Vec<TodoItem>>, action: &TodoAction) -> Rc<Vec<TodoItem>> {
    match action {
        TodoAction::AddTodo { id, text } => {
            let mut next = Vec::with_capacity(state.len() + 1);
            next.extend(state.iter().cloned());
            next.push(TodoItem::new(*id, text.clone()));
            Rc::new(next)
        },
        TodoAction::ToggleTodo { id } => Rc::new(
            state
                .iter()
                .map(|item| {
                    if item.id == *id {
                        TodoItem {
                            completed: !item.completed,
                            ..item.clone()
                        }
                    } else {
                        item.clone()
                    }
                })
                .collect(),
        ),
        TodoAction::FetchTodosSuccess { todos } => {
            let mut next: Vec<TodoItem> = state.iter().cloned().collect();
            for fetched in todos {
                match next.iter_mut().find(|item| item.id == fetched.id) {
                    Some(existing) => *existing = fetched.clone(),
                    None => next.push(fetched.clone()),
                }
            }
            Rc::new(next)
        },
        _ => Rc::clone(state),
    }
}

/// Active filter
pub fn visibility_filter(state: &VisibilityFilter, action: &TodoAction) -> VisibilityFilter {
    match action {
        TodoAction::SetVisibilityFilter { filter } => *filter,
        _ => *state,
    }
}

/// Visible notifications
///
/// - `ADD_NOTIFICATION` appends
/// - `REMOVE_NOTIFICATION` drops every entry with the id
pub fn notifications(state: &Rc<Vec<Notification>>, action: &TodoAction) -> Rc<Vec<Notification>> {
    match action {
        TodoAction::AddNotification { id, text } => {
            let mut next = Vec::with_capacity(state.len() + 1);
            next.extend(state.iter().cloned());
            next.push(Notification {
                id: *id,
                text: text.clone(),
            });
            Rc::new(next)
        },
        TodoAction::RemoveNotification { id } => {
            if state.iter().any(|notification| notification.id == *id) {
                Rc::new(state.iter().filter(|notification| notification.id != *id).cloned().collect())
            } else {
                Rc::clone(state)
            }
        },
        _ => Rc::clone(state),
    }
}

/// Fetch progress
pub fn fetch_status(state: &FetchStatus, action: &TodoAction) -> FetchStatus {
    match action {
        TodoAction::FetchTodosRequest => FetchStatus::Pending,
        TodoAction::FetchTodosSuccess { .. } => FetchStatus::Loaded,
        TodoAction::FetchTodosFailure { error } => FetchStatus::Failed(error.clone()),
        _ => state.clone(),
    }
}

combine_reducers! {
    /// Root reducer of the fetching variant
    pub struct FetchTodoReducer: FetchTodoState, TodoAction {
        items => items,
        visibility_filter => visibility_filter,
        fetch_status => fetch_status,
    }
}

combine_reducers! {
    /// Root reducer of the notifying variant
    pub struct NotifyTodoReducer: NotifyTodoState, TodoAction {
        items => items,
        visibility_filter => visibility_filter,
        notifications => notifications,
    }
}
