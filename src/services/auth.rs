use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{
        password::{hash_password_async, verify_password_async},
        AuthResponse, LoginRequest, RegisterRequest,
    },
    error::AppError,
    models::{NewUser, ProfileUpdate, UserChanges},
    state::AppState,
};

/// Creates an account and signs the new user in.
pub async fn register(
    state: &AppState,
    request: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    let request = request.normalized();
    request.validate()?;

    if state.store.find_user_by_email(&request.email).await?.is_some() {
        log::info!("registration rejected: email already registered");
        return Err(AppError::DuplicateUser);
    }

    let password_hash = hash_password_async(request.password, state.bcrypt_cost).await?;
    // The store enforces uniqueness again, so a concurrent registration still ends up
    // as DuplicateUser.
    let user = state
        .store
        .insert_user(NewUser {
            full_name: request.full_name,
            email: request.email,
            password_hash,
        })
        .await?;
    log::info!("registered user {}", user.id);

    let token = state.tokens.issue(user.id)?;
    Ok(AuthResponse::new(user.into(), token))
}

/// Checks credentials and issues a fresh token.
///
/// Unknown email and wrong password fail identically.
pub async fn login(state: &AppState, request: LoginRequest) -> Result<AuthResponse, AppError> {
    let Some(user) = state.store.find_user_by_email(request.email.trim()).await? else {
        log::info!("login failed: unknown email");
        // Spend one bcrypt round at the stored-hash cost so response time matches a
        // wrong password.
        let _ = hash_password_async(request.password, state.bcrypt_cost).await;
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password_async(request.password, user.password_hash.clone()).await? {
        log::info!("login failed: wrong password for user {}", user.id);
        return Err(AppError::InvalidCredentials);
    }

    log::info!("user {} logged in", user.id);
    let token = state.tokens.issue(user.id)?;
    Ok(AuthResponse::new(user.into(), token))
}

/// Applies a partial profile change for `user_id` and issues a fresh token.
///
/// Previously issued tokens stay valid until they expire.
pub async fn update_profile(
    state: &AppState,
    user_id: Uuid,
    update: ProfileUpdate,
) -> Result<AuthResponse, AppError> {
    let update = update.normalized();
    update.validate()?;
    if update.is_empty() {
        log::debug!("profile update for user {} carries no changes", user_id);
    }

    let password_hash = match update.password {
        Some(password) => Some(hash_password_async(password, state.bcrypt_cost).await?),
        None => None,
    };
    let changes = UserChanges {
        full_name: update.full_name,
        email: update.email,
        password_hash,
    };

    let user = state
        .store
        .update_user(user_id, changes)
        .await?
        .ok_or(AppError::UserNotFound)?;
    log::info!("user {} updated their profile", user.id);

    let token = state.tokens.issue(user.id)?;
    Ok(AuthResponse::new(user.into(), token))
}
