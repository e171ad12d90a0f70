use actix_web::{post, put, web, HttpResponse, Responder};

use crate::{
    auth::{AuthenticatedUser, LoginRequest, RegisterRequest},
    error::AppError,
    models::ProfileUpdate,
    services,
    state::AppState,
};

/// Register a new user
///
/// Creates the account and returns the public profile together with a token.
///
/// ## Responses:
/// - `201 Created`: `{ id, fullName, email, avatar, token }`.
/// - `400 Bad Request`: invalid input, or `"User already exists"`.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let response = services::auth::register(&state, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: same shape as registration.
/// - `401 Unauthorized`: `"Invalid credentials"` for any email/password mismatch.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = services::auth::login(&state, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Update the caller's profile. Blank or missing fields keep their current value.
#[put("")]
pub async fn update_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<ProfileUpdate>,
) -> Result<impl Responder, AppError> {
    let response = services::auth::update_profile(&state, user.0.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
