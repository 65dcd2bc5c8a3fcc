pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{IdentityMiddleware, TokenCodec};
use crate::error::{AppError, ACCOUNT_BODY_INVALID, TASK_BODY_INVALID};
use crate::models::Task;

/// Body of responses that carry only a status message.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Body of `201 Created` for `POST /todos`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskCreatedResponse {
    pub message: String,
    pub todo: Task,
}

/// Route table. `/signup`, `/login` and `/health` are public; everything
/// under `/todos` passes through the identity middleware first.
pub fn config(cfg: &mut web::ServiceConfig, codec: Arc<TokenCodec>) {
    cfg.app_data(json_config(ACCOUNT_BODY_INVALID))
        .service(health::health)
        .service(auth::signup)
        .service(auth::login)
        .service(
            web::scope("/todos")
                .wrap(IdentityMiddleware::new(codec))
                .app_data(json_config(TASK_BODY_INVALID))
                .app_data(path_config())
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

fn json_config(message: &'static str) -> web::JsonConfig {
    web::JsonConfig::default().error_handler(move |err, req| {
        log::debug!("rejected body for {} {}: {}", req.method(), req.path(), err);
        AppError::Validation(message.to_string()).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        log::debug!("rejected path {}: {}", req.path(), err);
        AppError::Internal("Unable to parse todo id".to_string()).into()
    })
}
