//! Persistence for users, tasks and categories.
//!
//! Handlers only see the [`Store`] trait. [`MemoryStore`] keeps everything in process and
//! backs the test-suite and database-less runs; [`PgStore`] persists to PostgreSQL.
//!
//! Mutations of owned records go through `*_owned_by` operations that check existence and
//! ownership and apply the change as one step, so a request can never modify a record it
//! was not allowed to touch at the moment of the write.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Category, NewUser, Task, TaskUpdate, User, UserChanges};

/// Errors raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another user already has this email.
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// The owner already has a category with this name.
    #[error("category already exists: {0}")]
    DuplicateCategory(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be mapped back to a model.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of an ownership-checked mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Owned<T> {
    /// The record existed, belonged to the caller, and the change was applied.
    Done(T),
    /// No record with that id.
    Missing,
    /// The record belongs to someone else and was left untouched.
    NotOwner,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a user. Fails with [`StoreError::DuplicateEmail`] if the email is taken.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Exact, case-sensitive match on the stored email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Applies a change set. `Ok(None)` if the user no longer exists.
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>>;

    /// All tasks of `owner`, newest first.
    async fn list_tasks(&self, owner: Uuid) -> StoreResult<Vec<Task>>;

    async fn insert_task(&self, task: Task) -> StoreResult<Task>;

    async fn update_task_owned_by(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: TaskUpdate,
    ) -> StoreResult<Owned<Task>>;

    async fn delete_task_owned_by(&self, id: Uuid, owner: Uuid) -> StoreResult<Owned<Uuid>>;

    /// All categories of `owner`, ordered by name.
    async fn list_categories(&self, owner: Uuid) -> StoreResult<Vec<Category>>;

    /// Fails with [`StoreError::DuplicateCategory`] if the owner already uses the name.
    async fn insert_category(&self, category: Category) -> StoreResult<Category>;

    async fn delete_category_owned_by(&self, id: Uuid, owner: Uuid)
        -> StoreResult<Owned<Uuid>>;
}
