use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskInput, TaskUpdate},
    services,
    state::AppState,
};

/// Lists the caller's tasks, newest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of tasks; `[]` when the caller has none.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = services::tasks::list(&state, user.0.id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the caller.
///
/// Only `title` is required. `priority` defaults to `Moderate`, `status` to
/// `Not Started` and `category` to `Work`.
///
/// ## Responses:
/// - `201 Created`: the stored task.
/// - `400 Bad Request`: missing title or out-of-range field.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = services::tasks::create(&state, user.0.id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Applies a partial update to one of the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: the task after the merge.
/// - `401 Unauthorized`: `"Not authorized"` when the task belongs to someone else.
/// - `404 Not Found`: no task with that id.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    body: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    let task =
        services::tasks::update(&state, task_id.into_inner(), user.0.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes one of the caller's tasks and echoes its id as `{ "id": ... }`.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let id = services::tasks::delete(&state, task_id.into_inner(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "id": id })))
}
