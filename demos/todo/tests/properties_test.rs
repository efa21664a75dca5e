//! Property-based tests for the todo reducers and selectors.

use composable_flux_core::Reducer;
use composable_flux_testing::properties::{fold_actions, sequences};
use proptest::prelude::*;
use std::rc::Rc;
use todo::selectors::visible_items;
use todo::{FetchTodoReducer, FetchTodoState, NotifyTodoReducer, NotifyTodoState, TodoAction, TodoItem, VisibilityFilter};

fn filter_strategy() -> impl Strategy<Value = VisibilityFilter> {
    prop_oneof![
        Just(VisibilityFilter::All),
        Just(VisibilityFilter::Completed),
        Just(VisibilityFilter::Active),
    ]
}

fn item_strategy() -> impl Strategy<Value = TodoItem> {
    (0_i64..20, "[a-z ]{0,12}", any::<bool>()).prop_map(|(id, text, completed)| TodoItem { id, text, completed })
}

fn action_strategy() -> impl Strategy<Value = TodoAction> {
    prop_oneof![
        (0_i64..20, "[a-z]{0,8}").prop_map(|(id, text)| TodoAction::AddTodo { id, text }),
        (0_i64..20).prop_map(|id| TodoAction::ToggleTodo { id }),
        filter_strategy().prop_map(|filter| TodoAction::SetVisibilityFilter { filter }),
        Just(TodoAction::FetchTodosRequest),
        prop::collection::vec(item_strategy(), 0..3).prop_map(|todos| TodoAction::FetchTodosSuccess { todos }),
        "[a-z]{1,8}".prop_map(|error| TodoAction::FetchTodosFailure { error }),
        (0_i64..20, "[a-z]{0,8}").prop_map(|(id, text)| TodoAction::AddNotification { id, text }),
        (0_i64..20).prop_map(|id| TodoAction::RemoveNotification { id }),
    ]
}

/// Actions no slice of the fetching variant handles
fn foreign_to_fetch_strategy() -> impl Strategy<Value = TodoAction> {
    prop_oneof![
        (0_i64..20, "[a-z]{0,8}").prop_map(|(id, text)| TodoAction::AddNotification { id, text }),
        (0_i64..20).prop_map(|id| TodoAction::RemoveNotification { id }),
    ]
}

/// Actions no slice of the notifying variant handles
fn foreign_to_notify_strategy() -> impl Strategy<Value = TodoAction> {
    prop_oneof![
        Just(TodoAction::FetchTodosRequest),
        "[a-z]{1,8}".prop_map(|error| TodoAction::FetchTodosFailure { error }),
    ]
}

fn fetch_state_strategy() -> impl Strategy<Value = FetchTodoState> {
    sequences(action_strategy(), 12).prop_map(|actions| fold_actions(&FetchTodoReducer, FetchTodoState::default(), &actions))
}

fn notify_state_strategy() -> impl Strategy<Value = NotifyTodoState> {
    sequences(action_strategy(), 12)
        .prop_map(|actions| fold_actions(&NotifyTodoReducer, NotifyTodoState::default(), &actions))
}

proptest! {
    #[test]
    fn prop_unhandled_action_leaves_fetch_state_equal(state in fetch_state_strategy(), action in foreign_to_fetch_strategy()) {
        let next = FetchTodoReducer.reduce(&state, &action);
        prop_assert_eq!(&next, &state);
        prop_assert!(Rc::ptr_eq(&next.items, &state.items));
    }

    #[test]
    fn prop_unhandled_action_leaves_notify_state_equal(state in notify_state_strategy(), action in foreign_to_notify_strategy()) {
        let next = NotifyTodoReducer.reduce(&state, &action);
        prop_assert_eq!(&next, &state);
        prop_assert!(Rc::ptr_eq(&next.items, &state.items));
        prop_assert!(Rc::ptr_eq(&next.notifications, &state.notifications));
    }

    #[test]
    fn prop_toggle_twice_restores_items(state in fetch_state_strategy(), id in 0_i64..20) {
        let toggle = TodoAction::ToggleTodo { id };
        let once = FetchTodoReducer.reduce(&state, &toggle);
        let twice = FetchTodoReducer.reduce(&once, &toggle);
        prop_assert_eq!(&twice.items, &state.items);
    }

    #[test]
    fn prop_reduce_never_mutates_previous_snapshot(state in notify_state_strategy(), action in action_strategy()) {
        let copy = state.clone();
        let _next = NotifyTodoReducer.reduce(&state, &action);
        prop_assert_eq!(state, copy);
    }

    #[test]
    fn prop_visible_items_partition(items in prop::collection::vec(item_strategy(), 0..16)) {
        let all = visible_items(&items, VisibilityFilter::All);
        let active = visible_items(&items, VisibilityFilter::Active);
        let completed = visible_items(&items, VisibilityFilter::Completed);

        prop_assert_eq!(all.len(), items.len());
        prop_assert_eq!(active.len() + completed.len(), items.len());
        prop_assert!(active.iter().all(|item| !item.completed));
        prop_assert!(completed.iter().all(|item| item.completed));
    }

    #[test]
    fn prop_repeated_fetch_response_is_idempotent(state in fetch_state_strategy(), todos in prop::collection::vec(item_strategy(), 0..4)) {
        let success = TodoAction::FetchTodosSuccess { todos };
        let once = FetchTodoReducer.reduce(&state, &success);
        let twice = FetchTodoReducer.reduce(&once, &success);
        prop_assert_eq!(&twice.items, &once.items);
    }

    #[test]
    fn prop_add_todo_grows_items_by_one(state in fetch_state_strategy(), id in 0_i64..100, text in "[a-z]{0,8}") {
        let next = FetchTodoReducer.reduce(&state, &TodoAction::AddTodo { id, text: text.clone() });
        prop_assert_eq!(next.items.len(), state.items.len() + 1);
        prop_assert_eq!(next.items.last(), Some(&TodoItem { id, text, completed: false }));
    }
}
