//! # Storage
//!
//! Handlers and services never talk to a database directly; they go through
//! the [`AccountStore`] and [`TaskStore`] traits. Two implementations exist:
//!
//! | Store | Backing | Used by |
//! |-------|---------|---------|
//! | [`postgres::PgStore`] | `sqlx` + Postgres | the binary when `DATABASE_URL` is set |
//! | [`memory::MemoryStore`] | `tokio::sync::RwLock` | the binary without a database, and the test suite |
//!
//! Every operation is a single read or a single write. Mutating task calls
//! take the owner id and constrain on it at the storage level too, so a
//! write can never land on another owner's row.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Account, Task, TaskUpdateInput, TodoItem};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Maps `sqlx` failures onto storage errors.
///
/// `RowNotFound` becomes `NotFound` and SQLSTATE 23505 becomes
/// `UniqueViolation`; everything else is a backend error.
impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match error {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23505") => {
                StoreError::UniqueViolation
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// An account about to be persisted. Holds the digest, never the plaintext.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_digest: String,
}

/// A task about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub list: Vec<TodoItem>,
    pub is_active: bool,
    pub owner_id: i64,
}

/// Replacement values for an existing task. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: String,
    pub list: Option<Vec<TodoItem>>,
    pub is_active: Option<bool>,
}

impl From<TaskUpdateInput> for TaskUpdate {
    fn from(input: TaskUpdateInput) -> Self {
        TaskUpdate {
            title: input.title,
            list: input.list,
            is_active: input.is_active,
        }
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `UniqueViolation` when the email is already registered.
    async fn insert_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError>;

    /// Loads a task regardless of owner. Fails with `NotFound` when absent.
    async fn find_task(&self, id: i64) -> Result<Task, StoreError>;

    /// Tasks owned by `owner_id`, newest first. The filter is applied by the
    /// store; rows of other owners are never returned.
    async fn list_tasks_for_owner(&self, owner_id: i64) -> Result<Vec<Task>, StoreError>;

    /// Fails with `NotFound` unless a task `id` owned by `owner_id` exists.
    async fn update_task(
        &self,
        id: i64,
        owner_id: i64,
        update: TaskUpdate,
    ) -> Result<Task, StoreError>;

    /// Fails with `NotFound` unless a task `id` owned by `owner_id` exists.
    async fn delete_task(&self, id: i64, owner_id: i64) -> Result<(), StoreError>;
}
