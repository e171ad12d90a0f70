use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser, error::AppError, models::CategoryInput, services, state::AppState,
};

#[get("")]
pub async fn list_categories(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let categories = services::categories::list(&state, user.0.id).await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// Creates a category. Names are unique per user; `color` defaults to `#000000`.
#[post("")]
pub async fn create_category(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<CategoryInput>,
) -> Result<impl Responder, AppError> {
    let category = services::categories::create(&state, user.0.id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(category))
}

/// Deletes a category. Tasks keep their category text.
#[delete("/{id}")]
pub async fn delete_category(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    category_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let id = services::categories::delete(&state, category_id.into_inner(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "id": id })))
}
