//! Derived views over todo state.

use crate::types::{TodoItem, TodoSlices, VisibilityFilter};

/// Items admitted by `filter`, in list order
#[must_use]
pub fn visible_items(items: &[TodoItem], filter: VisibilityFilter) -> Vec<&TodoItem> {
    items.iter().filter(|item| filter.admits(item.completed)).collect()
}

/// Items admitted by the state's active filter
#[must_use]
pub fn visible_todos<S: TodoSlices>(state: &S) -> Vec<&TodoItem> {
    visible_items(state.items(), state.visibility_filter())
}

/// Whether a filter link for `candidate` is the selected one
#[must_use]
pub fn filter_is_active(current: VisibilityFilter, candidate: VisibilityFilter) -> bool {
    current == candidate
}

/// Number of completed items
#[must_use]
pub fn completed_count(items: &[TodoItem]) -> usize {
    items.iter().filter(|item| item.completed).count()
}

/// Number of items still to do
#[must_use]
pub fn active_count(items: &[TodoItem]) -> usize {
    items.len() - completed_count(items)
}
