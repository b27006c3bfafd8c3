//! Persisted record to public todo projection.

use crate::todo::model::{Todo, TodoRecord, TodoStatus};

/// Project a stored record onto its public shape.
///
/// The empty `updated_by` sentinel collapses to `None`, and an unrecognised
/// status string projects to an absent status.
pub fn to_model_todo(record: TodoRecord) -> Todo {
    let status = TodoStatus::from_canonical(&record.status);
    let updated_by = if record.updated_by.is_empty() {
        None
    } else {
        Some(record.updated_by)
    };

    Todo {
        id: record.id.to_string(),
        created_date: Some(record.created_at),
        updated_date: Some(record.updated_at),
        content_code: Some(record.content_code),
        content_name: Some(record.content_name),
        description: Some(record.description),
        start_date: Some(record.start_date),
        end_date: Some(record.end_date),
        status,
        created_by: Some(record.created_by),
        updated_by,
    }
}

pub fn to_model_todos(records: Vec<TodoRecord>) -> Vec<Todo> {
    records.into_iter().map(to_model_todo).collect()
}
