use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::{Category, CategoryInput},
    state::AppState,
};

pub async fn list(state: &AppState, owner: Uuid) -> Result<Vec<Category>, AppError> {
    Ok(state.store.list_categories(owner).await?)
}

pub async fn create(
    state: &AppState,
    owner: Uuid,
    input: CategoryInput,
) -> Result<Category, AppError> {
    input.validate()?;
    Ok(state
        .store
        .insert_category(Category::new(input, owner))
        .await?)
}

pub async fn delete(state: &AppState, category_id: Uuid, owner: Uuid) -> Result<Uuid, AppError> {
    state
        .store
        .delete_category_owned_by(category_id, owner)
        .await?
        .into_result("Category")
}
