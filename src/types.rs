//! Core types for todo-api

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Todo ID type
pub type TodoId = i64;

/// A single persisted todo item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a todo.
///
/// `title` stays optional here so a missing field reaches the store and is
/// rejected as a validation error rather than by the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTodo {
    #[serde(default)]
    pub title: Option<String>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

/// Sparse set of mutable fields. `None` (absent or JSON `null`) leaves the
/// column untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TodoPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
}

impl TodoPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            done: None,
        }
    }

    pub fn done(done: bool) -> Self {
        Self {
            title: None,
            done: Some(done),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.done.is_none()
    }
}
