use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const DEFAULT_COLOR: &str = "#000000";

lazy_static! {
    // Display color for the category dot: #RRGGBB
    static ref COLOR_REGEX: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len == 0 || len > 50 {
        let mut error = ValidationError::new("length");
        error.message = Some("Category name must be 1 to 50 characters".into());
        return Err(error);
    }
    Ok(())
}

/// A user-defined label with a display color. Names are unique per owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryInput {
    #[serde(default)]
    #[validate(custom = "validate_name")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = "COLOR_REGEX", message = "Color must look like #RRGGBB"))]
    pub color: Option<String>,
}

impl Category {
    pub fn new(input: CategoryInput, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            name: input.name.trim().to_string(),
            color: input.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}
