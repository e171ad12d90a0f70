//! PostgreSQL store backed by `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use super::{Owned, Store, StoreError, StoreResult};
use crate::models::{Category, NewUser, Task, TaskUpdate, User, UserChanges};

const USER_COLUMNS: &str = "id, full_name, email, password_hash, avatar, created_at, updated_at";
const TASK_COLUMNS: &str = "id, user_id, title, description, image, priority, status, category, \
                            due_date, created_at, updated_at";
const CATEGORY_COLUMNS: &str = "id, user_id, name, color, created_at, updated_at";

/// Task row with priority and status kept as text.
#[derive(Debug, FromRow)]
struct TaskRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    image: Option<String>,
    priority: String,
    status: String,
    category: String,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            image: row.image,
            priority: row.priority.parse().map_err(StoreError::Corrupt)?,
            status: row.status.parse().map_err(StoreError::Corrupt)?,
            category: row.category,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|db| db.code())
        .map_or(false, |code| code == "23505")
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations under `migrations/`.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let user = User::new(user);
        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.avatar)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateEmail(user.email.clone())
                } else {
                    e.into()
                }
            })
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        let mut tx = self.pool.begin().await?;
        let select = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        let Some(mut user) = sqlx::query_as::<_, User>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        user.apply(changes);
        let update = format!(
            "UPDATE users SET full_name = $2, email = $3, password_hash = $4, updated_at = $5 \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, User>(&update)
            .bind(user.id)
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateEmail(user.email.clone())
                } else {
                    e.into()
                }
            })?;
        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn list_tasks(&self, owner: Uuid) -> StoreResult<Vec<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Task::try_from)
            .collect()
    }

    async fn insert_task(&self, task: Task) -> StoreResult<Task> {
        let sql = format!(
            "INSERT INTO tasks ({TASK_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {TASK_COLUMNS}"
        );
        // Timestamps come back at the column's precision, the same as later reads.
        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(task.id)
            .bind(task.user_id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(&task.image)
            .bind(task.priority.as_str())
            .bind(task.status.as_str())
            .bind(&task.category)
            .bind(task.due_date)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?
            .try_into()
    }

    async fn update_task_owned_by(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: TaskUpdate,
    ) -> StoreResult<Owned<Task>> {
        let mut tx = self.pool.begin().await?;
        let select = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 FOR UPDATE");
        let Some(row) = sqlx::query_as::<_, TaskRow>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(Owned::Missing);
        };
        if row.user_id != owner {
            return Ok(Owned::NotOwner);
        }

        let mut task = Task::try_from(row)?;
        changes.apply_to(&mut task);
        let update = format!(
            "UPDATE tasks SET title = $2, description = $3, image = $4, priority = $5, \
             status = $6, category = $7, due_date = $8, updated_at = $9 WHERE id = $1 \
             RETURNING {TASK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TaskRow>(&update)
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.image)
        .bind(task.priority.as_str())
        .bind(task.status.as_str())
        .bind(&task.category)
        .bind(task.due_date)
        .bind(task.updated_at)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Owned::Done(row.try_into()?))
    }

    async fn delete_task_owned_by(&self, id: Uuid, owner: Uuid) -> StoreResult<Owned<Uuid>> {
        let mut tx = self.pool.begin().await?;
        let found: Option<(Uuid,)> =
            sqlx::query_as("SELECT user_id FROM tasks WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        match found {
            None => return Ok(Owned::Missing),
            Some((user_id,)) if user_id != owner => return Ok(Owned::NotOwner),
            Some(_) => {}
        }
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Owned::Done(id))
    }

    async fn list_categories(&self, owner: Uuid) -> StoreResult<Vec<Category>> {
        let sql =
            format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE user_id = $1 ORDER BY name");
        Ok(sqlx::query_as::<_, Category>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_category(&self, category: Category) -> StoreResult<Category> {
        let sql = format!(
            "INSERT INTO categories ({CATEGORY_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(category.id)
            .bind(category.user_id)
            .bind(&category.name)
            .bind(&category.color)
            .bind(category.created_at)
            .bind(category.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateCategory(category.name.clone())
                } else {
                    e.into()
                }
            })
    }

    async fn delete_category_owned_by(
        &self,
        id: Uuid,
        owner: Uuid,
    ) -> StoreResult<Owned<Uuid>> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 1 {
            return Ok(Owned::Done(id));
        }
        // Nothing deleted: tell a missing row apart from someone else's.
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(match exists {
            Some(_) => Owned::NotOwner,
            None => Owned::Missing,
        })
    }
}
