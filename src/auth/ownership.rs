//! Single-owner authorization for tasks.
//!
//! Every task belongs to exactly one account. Reads and writes of a specific
//! task are allowed only to that account, and the check runs before any
//! write is attempted. Listing is scoped in the store query instead, and
//! creation takes the owner from the authenticated subject.

use crate::auth::extractors::AuthenticatedSubject;
use crate::error::AppError;
use crate::models::{Task, TaskInput};
use crate::store::NewTask;

/// Rejects with `AppError::Authorization(denied)` unless `subject` owns `task`.
pub fn ensure_owner(
    subject: AuthenticatedSubject,
    task: &Task,
    denied: &str,
) -> Result<(), AppError> {
    if task.owner_id != subject.id() {
        log::warn!(
            "subject {} denied access to task {} owned by {}",
            subject.id(),
            task.id,
            task.owner_id
        );
        return Err(AppError::Authorization(denied.to_string()));
    }
    Ok(())
}

/// Builds the row for a new task, owned by `subject`.
pub fn owned_task(subject: AuthenticatedSubject, input: TaskInput) -> NewTask {
    NewTask {
        title: input.title,
        list: input.list,
        is_active: input.is_active,
        owner_id: subject.id(),
    }
}
