//! Domain types for the todo demos.
//!
//! Records, the visibility filter, the action enum shared by both variants
//! and the two state trees.

use composable_flux_macros::Action;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Identifier, unique within a session
    pub id: i64,
    /// Free text, not validated
    pub text: String,
    /// Whether the item is done
    pub completed: bool,
}

impl TodoItem {
    /// Creates an item that is not completed
    #[must_use]
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }
}

/// Which items a list view shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisibilityFilter {
    /// Every item
    #[default]
    #[serde(rename = "SHOW_ALL")]
    All,
    /// Completed items only
    #[serde(rename = "SHOW_COMPLETED")]
    Completed,
    /// Items not yet completed
    #[serde(rename = "SHOW_ACTIVE")]
    Active,
}

impl VisibilityFilter {
    /// Every filter, in footer order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// The wire tag, e.g. `"SHOW_ALL"`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "SHOW_ALL",
            Self::Completed => "SHOW_COMPLETED",
            Self::Active => "SHOW_ACTIVE",
        }
    }

    /// Returns true if an item with the given completion flag is shown
    #[must_use]
    pub const fn admits(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Completed => completed,
            Self::Active => !completed,
        }
    }
}

impl fmt::Display for VisibilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown filter tag
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown visibility filter `{0}`; expected SHOW_ALL, SHOW_COMPLETED or SHOW_ACTIVE")]
pub struct ParseFilterError(pub String);

impl FromStr for VisibilityFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SHOW_ALL" => Ok(Self::All),
            "SHOW_COMPLETED" => Ok(Self::Completed),
            "SHOW_ACTIVE" => Ok(Self::Active),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

/// A transient message shown to the user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Identifier, unique within a session
    pub id: i64,
    /// Message text
    pub text: String,
}

/// Progress of the simulated fetch
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "error", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetchStatus {
    /// No request made yet
    #[default]
    Idle,
    /// Request sent, response not received
    Pending,
    /// Response received and applied
    Loaded,
    /// Response carried an error
    Failed(String),
}

/// Body of a (simulated) fetch response
///
/// An `error` takes precedence over `todos`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Records returned by the server
    #[serde(default)]
    pub todos: Vec<TodoItem>,
    /// Error reported by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Actions for both todo variants
///
/// Serialized with the tag in a `type` field, e.g.
/// `{"type":"ADD_TODO","id":0,"text":"buy milk"}`.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoAction {
    /// Append a new item
    AddTodo {
        /// Id from the action creator's generator
        id: i64,
        /// Item text
        text: String,
    },

    /// Flip `completed` on the matching item
    ToggleTodo {
        /// Item to toggle
        id: i64,
    },

    /// Change the active filter
    SetVisibilityFilter {
        /// The new filter
        filter: VisibilityFilter,
    },

    /// A fetch was started
    FetchTodosRequest,

    /// A fetch completed
    FetchTodosSuccess {
        /// Records from the server
        todos: Vec<TodoItem>,
    },

    /// A fetch failed
    FetchTodosFailure {
        /// Error from the server
        error: String,
    },

    /// Show a notification
    AddNotification {
        /// Id from the action creator's generator
        id: i64,
        /// Message text
        text: String,
    },

    /// Hide a notification
    RemoveNotification {
        /// Notification to remove
        id: i64,
    },
}

/// State of the fetching variant
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FetchTodoState {
    /// Todo items, in insertion order
    pub items: Rc<Vec<TodoItem>>,
    /// Active filter
    pub visibility_filter: VisibilityFilter,
    /// Progress of the last fetch
    pub fetch_status: FetchStatus,
}

/// State of the notifying variant
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NotifyTodoState {
    /// Todo items, in insertion order
    pub items: Rc<Vec<TodoItem>>,
    /// Active filter
    pub visibility_filter: VisibilityFilter,
    /// Visible notifications, oldest first
    pub notifications: Rc<Vec<Notification>>,
}

/// Read access to the slices shared by both variants
pub trait TodoSlices {
    /// The todo items
    fn items(&self) -> &[TodoItem];

    /// The active filter
    fn visibility_filter(&self) -> VisibilityFilter;
}

impl TodoSlices for FetchTodoState {
    fn items(&self) -> &[TodoItem] {
        &self.items
    }

    fn visibility_filter(&self) -> VisibilityFilter {
        self.visibility_filter
    }
}

impl TodoSlices for NotifyTodoState {
    fn items(&self) -> &[TodoItem] {
        &self.items
    }

    fn visibility_filter(&self) -> VisibilityFilter {
        self.visibility_filter
    }
}
