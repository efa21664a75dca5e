//! Tests for #[derive(Action)] macro

use composable_flux_core::Action;
use composable_flux_macros::Action;

#[derive(Action, Clone, Debug, PartialEq)]
enum TodoAction {
    AddTodo {
        id: i64,
        text: String,
    },

    ToggleTodo {
        id: i64,
    },

    SetVisibilityFilter(String),

    FetchTodosRequest,

    #[action_type = "@@INIT"]
    Init,
}

#[test]
fn test_named_variant_tag() {
    let action = TodoAction::AddTodo {
        id: 0,
        text: "buy milk".to_string(),
    };
    assert_eq!(action.action_type(), "ADD_TODO");
}

#[test]
fn test_tuple_variant_tag() {
    let action = TodoAction::SetVisibilityFilter("SHOW_ALL".to_string());
    assert_eq!(action.action_type(), "SET_VISIBILITY_FILTER");
}

#[test]
fn test_unit_variant_tag() {
    assert_eq!(TodoAction::FetchTodosRequest.action_type(), "FETCH_TODOS_REQUEST");
}

#[test]
fn test_tag_override() {
    assert_eq!(TodoAction::Init.action_type(), "@@INIT");
}

#[test]
fn test_action_types_in_declaration_order() {
    assert_eq!(
        TodoAction::ACTION_TYPES,
        &[
            "ADD_TODO",
            "TOGGLE_TODO",
            "SET_VISIBILITY_FILTER",
            "FETCH_TODOS_REQUEST",
            "@@INIT",
        ]
    );
}

#[test]
fn test_every_variant_reports_a_listed_tag() {
    let actions = vec![
        TodoAction::AddTodo {
            id: 1,
            text: String::new(),
        },
        TodoAction::ToggleTodo { id: 1 },
        TodoAction::SetVisibilityFilter(String::new()),
        TodoAction::FetchTodosRequest,
        TodoAction::Init,
    ];

    for action in actions {
        assert!(
            TodoAction::ACTION_TYPES.contains(&action.action_type()),
            "Unlisted tag for {action:?}"
        );
    }
}
