use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{AccountStore, NewAccount, NewTask, StoreError, TaskStore, TaskUpdate};
use crate::models::{Account, Task};

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<i64, Account>,
    tasks: BTreeMap<i64, Task>,
    last_account_id: i64,
    last_task_id: i64,
}

/// In-process store with the same semantics as the Postgres one.
///
/// Ids are assigned sequentially from 1. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn set_account_active(&self, id: i64, is_active: bool) {
        if let Some(account) = self.tables.write().await.accounts.get_mut(&id) {
            account.is_active = is_active;
        }
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::UniqueViolation);
        }

        tables.last_account_id += 1;
        let now = Utc::now();
        let stored = Account {
            id: tables.last_account_id,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            password_digest: account.password_digest,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.accounts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| a.email == email).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&task.owner_id) {
            // Mirrors the foreign key on todos.user_id.
            return Err(StoreError::Backend(format!(
                "owner {} does not exist",
                task.owner_id
            )));
        }

        tables.last_task_id += 1;
        let now = Utc::now();
        let stored = Task {
            id: tables.last_task_id,
            title: task.title,
            list: task.list,
            is_active: task.is_active,
            created_at: now,
            updated_at: now,
            owner_id: task.owner_id,
        };
        tables.tasks.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_task(&self, id: i64) -> Result<Task, StoreError> {
        let tables = self.tables.read().await;
        tables.tasks.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list_tasks_for_owner(&self, owner_id: i64) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .rev()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update_task(
        &self,
        id: i64,
        owner_id: i64,
        update: TaskUpdate,
    ) -> Result<Task, StoreError> {
        let mut tables = self.tables.write().await;
        let task = tables
            .tasks
            .get_mut(&id)
            .filter(|t| t.owner_id == owner_id)
            .ok_or(StoreError::NotFound)?;

        task.title = update.title;
        if let Some(list) = update.list {
            task.list = list;
        }
        if let Some(is_active) = update.is_active {
            task.is_active = is_active;
        }
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn delete_task(&self, id: i64, owner_id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .tasks
            .get(&id)
            .is_some_and(|t| t.owner_id == owner_id);
        if !owned {
            return Err(StoreError::NotFound);
        }
        tables.tasks.remove(&id);
        Ok(())
    }
}
