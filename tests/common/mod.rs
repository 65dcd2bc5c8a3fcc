#![allow(dead_code)]

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    test, Error,
};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use todoguard::{
    auth::{LoginResponse, PasswordHasher, TokenCodec},
    models::Task,
    state::AppState,
    store::{MemoryStore, NewTask, StoreError, TaskStore, TaskUpdate},
};

pub const SECRET: &[u8] = b"integration-test-secret";

/// Fresh in-memory state with a cheap hashing cost.
pub fn test_state() -> AppState {
    AppState::new(
        Arc::new(MemoryStore::new()),
        TokenCodec::new(SECRET).unwrap(),
        PasswordHasher::new(4),
    )
    .unwrap()
}

/// Backend detail carried by every [`BrokenTaskStore`] failure.
pub const BACKEND_CAUSE: &str = "connection reset by db-primary:5432";

/// Task store whose inserts and lookups work but whose listing and writes
/// fail at the backend.
pub struct BrokenTaskStore {
    inner: MemoryStore,
}

#[async_trait]
impl TaskStore for BrokenTaskStore {
    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError> {
        self.inner.insert_task(task).await
    }

    async fn find_task(&self, id: i64) -> Result<Task, StoreError> {
        self.inner.find_task(id).await
    }

    async fn list_tasks_for_owner(&self, _owner_id: i64) -> Result<Vec<Task>, StoreError> {
        Err(StoreError::Backend(BACKEND_CAUSE.to_string()))
    }

    async fn update_task(
        &self,
        _id: i64,
        _owner_id: i64,
        _update: TaskUpdate,
    ) -> Result<Task, StoreError> {
        Err(StoreError::Backend(BACKEND_CAUSE.to_string()))
    }

    async fn delete_task(&self, _id: i64, _owner_id: i64) -> Result<(), StoreError> {
        Err(StoreError::Backend(BACKEND_CAUSE.to_string()))
    }
}

/// Accounts in memory, tasks behind a [`BrokenTaskStore`] over the same data.
pub fn broken_task_state() -> AppState {
    let memory = MemoryStore::new();
    AppState::with_stores(
        Arc::new(memory.clone()),
        Arc::new(BrokenTaskStore { inner: memory }),
        TokenCodec::new(SECRET).unwrap(),
        PasswordHasher::new(4),
    )
    .unwrap()
}

/// Signs up and logs in `email`, returning the issued token.
pub async fn register<S, B>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/signup")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "signup of {} failed", email);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "login of {} failed", email);

    let body: LoginResponse = test::read_body_json(resp).await;
    body.token
}

/// Subject id carried by `token`.
pub fn subject_of(token: &str) -> i64 {
    TokenCodec::new(SECRET).unwrap().verify(token).unwrap()
}

pub fn authorized(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header((header::AUTHORIZATION, token.to_string()))
}
