use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One line of a task's checklist.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub item: String,
    #[serde(default)]
    pub checked: bool,
}

/// A task as stored and returned by the API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier assigned by storage.
    pub id: i64,
    pub title: String,
    /// Ordered checklist.
    pub list: Vec<TodoItem>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Account that created the task. Set from the authenticated subject only.
    pub owner_id: i64,
}

/// Payload for `POST /todos`.
///
/// Has no owner field; an `ownerId` sent by the client is dropped during
/// deserialization.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub list: Vec<TodoItem>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Payload for `PUT /todos/{id}`. Omitted optional fields keep their stored value.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub list: Option<Vec<TodoItem>>,
    pub is_active: Option<bool>,
}

fn default_active() -> bool {
    true
}
