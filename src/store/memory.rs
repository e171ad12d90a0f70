//! In-memory store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Owned, Store, StoreError, StoreResult};
use crate::models::{Category, NewUser, Task, TaskUpdate, User, UserChanges};

/// Keeps all records in process memory. Nothing survives a restart.
///
/// Tasks and categories are kept in insertion order so that records created within the
/// same clock tick still list newest first.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    tasks: RwLock<Vec<Task>>,
    categories: RwLock<Vec<Category>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        let user = User::new(user);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;
        if !users.contains_key(&id) {
            return Ok(None);
        }
        if let Some(email) = &changes.email {
            if users.values().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::DuplicateEmail(email.clone()));
            }
        }
        Ok(users.get_mut(&id).map(|user| {
            user.apply(changes);
            user.clone()
        }))
    }

    async fn list_tasks(&self, owner: Uuid) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks
            .iter()
            .rev()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect();
        // Stable: ties keep reverse insertion order.
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn insert_task(&self, task: Task) -> StoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task_owned_by(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: TaskUpdate,
    ) -> StoreResult<Owned<Task>> {
        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(Owned::Missing);
        };
        if task.user_id != owner {
            return Ok(Owned::NotOwner);
        }
        changes.apply_to(task);
        Ok(Owned::Done(task.clone()))
    }

    async fn delete_task_owned_by(&self, id: Uuid, owner: Uuid) -> StoreResult<Owned<Uuid>> {
        let mut tasks = self.tasks.write().await;
        let Some(index) = tasks.iter().position(|t| t.id == id) else {
            return Ok(Owned::Missing);
        };
        if tasks[index].user_id != owner {
            return Ok(Owned::NotOwner);
        }
        tasks.remove(index);
        Ok(Owned::Done(id))
    }

    async fn list_categories(&self, owner: Uuid) -> StoreResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut owned: Vec<Category> = categories
            .iter()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(owned)
    }

    async fn insert_category(&self, category: Category) -> StoreResult<Category> {
        let mut categories = self.categories.write().await;
        if categories
            .iter()
            .any(|c| c.user_id == category.user_id && c.name == category.name)
        {
            return Err(StoreError::DuplicateCategory(category.name));
        }
        categories.push(category.clone());
        Ok(category)
    }

    async fn delete_category_owned_by(
        &self,
        id: Uuid,
        owner: Uuid,
    ) -> StoreResult<Owned<Uuid>> {
        let mut categories = self.categories.write().await;
        let Some(index) = categories.iter().position(|c| c.id == id) else {
            return Ok(Owned::Missing);
        };
        if categories[index].user_id != owner {
            return Ok(Owned::NotOwner);
        }
        categories.remove(index);
        Ok(Owned::Done(id))
    }
}
