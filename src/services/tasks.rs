use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::{Task, TaskInput, TaskUpdate},
    state::AppState,
    store::Owned,
};

/// All tasks owned by `owner`, newest first.
pub async fn list(state: &AppState, owner: Uuid) -> Result<Vec<Task>, AppError> {
    Ok(state.store.list_tasks(owner).await?)
}

pub async fn create(state: &AppState, owner: Uuid, input: TaskInput) -> Result<Task, AppError> {
    input.validate()?;
    let task = state.store.insert_task(Task::new(input, owner)).await?;
    log::debug!("user {} created task {}", owner, task.id);
    Ok(task)
}

/// Merges `changes` into the task if it exists and belongs to `owner`.
pub async fn update(
    state: &AppState,
    task_id: Uuid,
    owner: Uuid,
    changes: TaskUpdate,
) -> Result<Task, AppError> {
    changes.validate()?;
    let outcome = state
        .store
        .update_task_owned_by(task_id, owner, changes)
        .await?;
    if outcome == Owned::NotOwner {
        log::warn!("user {} tried to update task {} owned by someone else", owner, task_id);
    }
    outcome.into_result("Task")
}

/// Deletes the task if it exists and belongs to `owner`, returning its id.
pub async fn delete(state: &AppState, task_id: Uuid, owner: Uuid) -> Result<Uuid, AppError> {
    let outcome = state.store.delete_task_owned_by(task_id, owner).await?;
    if outcome == Owned::NotOwner {
        log::warn!("user {} tried to delete task {} owned by someone else", owner, task_id);
    }
    outcome.into_result("Task")
}
