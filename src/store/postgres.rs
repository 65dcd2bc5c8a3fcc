use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};

use super::{AccountStore, NewAccount, NewTask, StoreError, TaskStore, TaskUpdate};
use crate::models::{Account, Task, TodoItem};

const ACCOUNT_COLUMNS: &str =
    "id, email, first_name, last_name, password, is_active, created_at, updated_at";

const TASK_COLUMNS: &str = "id, title, list, is_active, created_at, updated_at, user_id";

const CREATE_USERS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL DEFAULT '',
        last_name TEXT NOT NULL DEFAULT '',
        password TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )";

const CREATE_TODOS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS todos (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        list JSONB NOT NULL DEFAULT '[]'::jsonb,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
    )";

const CREATE_TODOS_OWNER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS todos_user_id_idx ON todos (user_id, created_at DESC)";

#[derive(FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    first_name: String,
    last_name: String,
    password: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            password_digest: row.password,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    list: Json<Vec<TodoItem>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_id: i64,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            title: row.title,
            list: row.list.0,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            owner_id: row.user_id,
        }
    }
}

/// Postgres-backed store over a shared `PgPool`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `users` and `todos` tables when they do not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in [CREATE_USERS_TABLE, CREATE_TODOS_TABLE, CREATE_TODOS_OWNER_INDEX] {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        log::info!("database schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn insert_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let sql = format!(
            "INSERT INTO users (email, first_name, last_name, password) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            ACCOUNT_COLUMNS
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(account.email)
            .bind(account.first_name)
            .bind(account.last_name)
            .bind(account.password_digest)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", ACCOUNT_COLUMNS);
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Account::from))
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError> {
        let sql = format!(
            "INSERT INTO todos (title, list, is_active, user_id) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            TASK_COLUMNS
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(task.title)
            .bind(Json(task.list))
            .bind(task.is_active)
            .bind(task.owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn find_task(&self, id: i64) -> Result<Task, StoreError> {
        let sql = format!("SELECT {} FROM todos WHERE id = $1", TASK_COLUMNS);
        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Task::from)
            .ok_or(StoreError::NotFound)
    }

    async fn list_tasks_for_owner(&self, owner_id: i64) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            "SELECT {} FROM todos WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            TASK_COLUMNS
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn update_task(
        &self,
        id: i64,
        owner_id: i64,
        update: TaskUpdate,
    ) -> Result<Task, StoreError> {
        let sql = format!(
            "UPDATE todos \
             SET title = $1, list = COALESCE($2, list), is_active = COALESCE($3, is_active), \
                 updated_at = NOW() \
             WHERE id = $4 AND user_id = $5 \
             RETURNING {}",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(update.title)
            .bind(update.list.map(Json))
            .bind(update.is_active)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?
            .map(Task::from)
            .ok_or(StoreError::NotFound)
    }

    async fn delete_task(&self, id: i64, owner_id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
