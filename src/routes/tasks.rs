use crate::{
    auth::{
        ownership::{ensure_owner, owned_task},
        AuthenticatedSubject,
    },
    error::{AppError, TASK_BODY_INVALID, UNAUTHORIZED_ACCESS},
    models::{TaskInput, TaskUpdateInput},
    routes::{MessageResponse, TaskCreatedResponse},
    store::TaskStore,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

fn validate_body(input: &impl Validate) -> Result<(), AppError> {
    input.validate().map_err(|e| {
        log::debug!("task payload rejected: {}", e);
        AppError::Validation(TASK_BODY_INVALID.into())
    })
}

/// Retrieves the authenticated account's tasks, newest first.
///
/// The owner filter is applied by the store; other accounts' tasks are never
/// loaded.
#[get("")]
pub async fn list_tasks(
    store: web::Data<dyn TaskStore>,
    subject: AuthenticatedSubject,
) -> Result<impl Responder, AppError> {
    let tasks = store
        .list_tasks_for_owner(subject.id())
        .await
        .map_err(|e| AppError::persistence("Unable to fetch todos", e))?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated account.
///
/// ## Responses:
/// - `201 Created`: `{"message": "Todo created", "todo": Task}`.
/// - `400 Bad Request`: unparsable payload or a title outside 1..=200 chars.
/// - `500 Internal Server Error`: storage failure.
#[post("")]
pub async fn create_task(
    store: web::Data<dyn TaskStore>,
    subject: AuthenticatedSubject,
    payload: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let input = payload.into_inner();
    validate_body(&input)?;

    let task = store
        .insert_task(owned_task(subject, input))
        .await
        .map_err(|e| AppError::persistence("Unable to create todo", e))?;
    log::info!("task {} created by account {}", task.id, subject.id());

    Ok(HttpResponse::Created().json(TaskCreatedResponse {
        message: "Todo created".to_string(),
        todo: task,
    }))
}

/// Retrieves a single task owned by the authenticated account.
#[get("/{id}")]
pub async fn get_task(
    store: web::Data<dyn TaskStore>,
    subject: AuthenticatedSubject,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = store
        .find_task(path.into_inner())
        .await
        .map_err(|e| AppError::persistence("Unable to fetch todo", e))?;
    ensure_owner(subject, &task, UNAUTHORIZED_ACCESS)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Replaces a task's title and, when present, its checklist and active flag.
///
/// Ownership is checked against the stored task before the write.
#[put("/{id}")]
pub async fn update_task(
    store: web::Data<dyn TaskStore>,
    subject: AuthenticatedSubject,
    path: web::Path<i64>,
    payload: web::Json<TaskUpdateInput>,
) -> Result<impl Responder, AppError> {
    let task_id = path.into_inner();
    let input = payload.into_inner();
    validate_body(&input)?;

    let task = store
        .find_task(task_id)
        .await
        .map_err(|e| AppError::persistence("Unable to fetch todo to update", e))?;
    ensure_owner(subject, &task, "Unauthorized update")?;

    store
        .update_task(task_id, subject.id(), input.into())
        .await
        .map_err(|e| AppError::persistence("Unable to update todo", e))?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Todo updated successfully")))
}

#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<dyn TaskStore>,
    subject: AuthenticatedSubject,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task_id = path.into_inner();

    let task = store
        .find_task(task_id)
        .await
        .map_err(|e| AppError::persistence("Unable to fetch todo to delete", e))?;
    ensure_owner(subject, &task, "Unauthorized delete")?;

    store
        .delete_task(task_id, subject.id())
        .await
        .map_err(|e| AppError::persistence("Unable to delete the todo", e))?;
    log::info!("task {} deleted by account {}", task_id, subject.id());

    Ok(HttpResponse::Ok().json(MessageResponse::new("Todo deleted successfully")))
}
