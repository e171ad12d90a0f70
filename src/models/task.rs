use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;
use validator::{validate_url, Validate, ValidationError};

pub const DEFAULT_CATEGORY: &str = "Work";

/// Represents the priority of a task.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskPriority {
    Low,
    #[default]
    Moderate,
    High,
    Vital,
}

/// Represents the status of a task.
///
/// The variants describe a lifecycle but nothing enforces it: an update may move a task
/// from any status to any other.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Moderate => "Moderate",
            TaskPriority::High => "High",
            TaskPriority::Vital => "Vital",
        }
    }
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(TaskPriority::Low),
            "Moderate" => Ok(TaskPriority::Moderate),
            "High" => Ok(TaskPriority::High),
            "Vital" => Ok(TaskPriority::Vital),
            other => Err(format!("unknown task priority '{}'", other)),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown task status '{}'", s))
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Please add a task title".into());
        return Err(error);
    }
    if title.chars().count() > 200 {
        let mut error = ValidationError::new("length");
        error.message = Some("Title must be at most 200 characters".into());
        return Err(error);
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<(), ValidationError> {
    let len = category.trim().chars().count();
    if len == 0 || len > 50 {
        let mut error = ValidationError::new("length");
        error.message = Some("Category must be 1 to 50 characters".into());
        return Err(error);
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > 1000 {
        let mut error = ValidationError::new("length");
        error.message = Some("Description must be at most 1000 characters".into());
        return Err(error);
    }
    Ok(())
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Payload for creating a task.
///
/// `title` defaults to empty when the key is missing so that the caller gets the
/// title-specific validation message rather than a generic parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskInput {
    #[serde(default)]
    #[validate(custom = "validate_title")]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_description")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_category")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update of a task. Keys left out keep their stored value; `description`,
/// `image` and `dueDate` can be cleared with an explicit `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "validate_nullable_fields"))]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_title")]
    pub title: Option<String>,

    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,

    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_category")]
    pub category: Option<String>,

    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

fn validate_nullable_fields(update: &TaskUpdate) -> Result<(), ValidationError> {
    if let Some(Some(description)) = &update.description {
        validate_description(description)?;
    }
    if let Some(Some(image)) = &update.image {
        if !validate_url(image.as_str()) {
            let mut error = ValidationError::new("url");
            error.message = Some("Image must be a valid URL".into());
            return Err(error);
        }
    }
    Ok(())
}

/// A task as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    /// Owner. Set at creation and never changed.
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Builds a new task owned by `owner`, filling in the defaults for
    /// priority, status and category.
    pub fn new(input: TaskInput, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            title: input.title.trim().to_string(),
            description: input.description,
            image: input.image,
            priority: input.priority.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            category: input
                .category
                .map(|c| c.trim().to_string())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TaskUpdate {
    /// Merges the supplied fields into `task`. Ownership and id are never touched.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(image) = self.image {
            task.image = image;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(category) = self.category {
            task.category = category.trim().to_string();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        task.updated_at = Utc::now();
    }
}
