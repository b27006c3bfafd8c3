//! Todo data model.
//!
//! `TodoRecord` is the persisted shape owned by the store. `Todo` is the
//! public projection handed back to callers; every field except the id is
//! optional there, and absent fields are omitted when serialized.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoStatus {
    Active,
    Inactive,
}

impl TodoStatus {
    /// Canonical string stored alongside a record.
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Active => "ACTIVE",
            TodoStatus::Inactive => "INACTIVE",
        }
    }

    /// Map a stored status string back onto the enum.
    ///
    /// Only the exact canonical strings are recognised. Anything else
    /// (legacy values, empty) yields `None` rather than an error.
    pub fn from_canonical(s: &str) -> Option<Self> {
        if s == TodoStatus::Active.as_str() {
            Some(TodoStatus::Active)
        } else if s == TodoStatus::Inactive.as_str() {
            Some(TodoStatus::Inactive)
        } else {
            None
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when user input names no known status.
#[derive(Debug, Clone, Error)]
#[error("unknown todo status '{0}' (expected ACTIVE or INACTIVE)")]
pub struct UnknownStatus(pub String);

impl FromStr for TodoStatus {
    type Err = UnknownStatus;

    /// Case-insensitive parse for user-supplied input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(TodoStatus::Active),
            "INACTIVE" => Ok(TodoStatus::Inactive),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// A todo as persisted by a [`TodoStore`](crate::store::TodoStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoRecord {
    /// Store-assigned identifier. Never changes after creation.
    pub id: u64,
    pub content_code: String,
    pub content_name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Canonical status string, or whatever legacy value the row carries.
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    /// Empty until the first update.
    #[serde(default)]
    pub updated_by: String,
}

/// Public projection of a [`TodoRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Decimal rendering of the record id.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TodoStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Page size and 1-based page number requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInput {
    pub count: i64,
    pub page: i64,
}

/// Derived paging facts for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub total_count: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

/// One page of todos plus its paging facts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPagination {
    pub pagination_info: PaginationInfo,
    pub todos: Vec<Todo>,
}

/// Optional search filters. Every present field narrows the result set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoSearchInput {
    /// Case-insensitive substring of the content code.
    #[serde(default)]
    pub content_code: Option<String>,
    /// Case-insensitive substring of the content name.
    #[serde(default)]
    pub content_name: Option<String>,
    /// Inclusive lower bound on the creation timestamp.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the creation timestamp.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<TodoStatus>,
}

impl TodoSearchInput {
    pub fn is_empty(&self) -> bool {
        self.content_code.is_none()
            && self.content_name.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoInput {
    pub content_code: String,
    pub content_name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: TodoStatus,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoInput {
    #[serde(default)]
    pub content_code: Option<String>,
    #[serde(default)]
    pub content_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<TodoStatus>,
}
