//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every handler and service returns `Result<_, AppError>`, and `AppError` implements
//! `actix_web::error::ResponseError` so failures turn into JSON responses of the shape
//! `{"error": "<message>"}`.
//!
//! Messages for authentication failures are deliberately uniform: a caller cannot tell an
//! unknown email from a wrong password, or an expired token from a forged one.
//! Server-side failures are logged with their detail and surfaced only as `"Server Error"`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::store::StoreError;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const UNAUTHENTICATED: &str = "Not authorized, token failed";
pub const FORBIDDEN: &str = "Not authorized";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed required input (HTTP 400).
    ValidationError(String),
    /// Registration or email change collides with an existing account (HTTP 400).
    DuplicateUser,
    /// Login failed. Same message whether the email or the password was wrong (HTTP 401).
    InvalidCredentials,
    /// Missing, invalid or expired bearer token, or a token whose user is gone (HTTP 401).
    Unauthenticated,
    /// Authenticated, but not the owner of the resource (HTTP 401). The body differs from
    /// `Unauthenticated`, so clients can tell the two apart.
    Forbidden,
    /// The addressed resource does not exist (HTTP 404).
    NotFound(String),
    /// The authenticated identity no longer resolves to a user (HTTP 404).
    UserNotFound,
    /// Unexpected store or infrastructure failure (HTTP 500).
    /// The detail is logged, never sent to the caller.
    ServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DuplicateUser => write!(f, "Duplicate User"),
            AppError::InvalidCredentials => write!(f, "Invalid Credentials"),
            AppError::Unauthenticated => write!(f, "Unauthenticated"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::UserNotFound => write!(f, "User Not Found"),
            AppError::ServerError(msg) => write!(f, "Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// The message sent to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::DuplicateUser => "User already exists".to_string(),
            AppError::InvalidCredentials => INVALID_CREDENTIALS.to_string(),
            AppError::Unauthenticated => UNAUTHENTICATED.to_string(),
            AppError::Forbidden => FORBIDDEN.to_string(),
            AppError::UserNotFound => "User not found".to_string(),
            AppError::ServerError(_) => "Server Error".to_string(),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::DuplicateUser => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthenticated | AppError::Forbidden => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound(_) | AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::ServerError(detail) = self {
            log::error!("request failed: {}", detail);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.public_message()
        }))
    }
}

/// Duplicate-key failures keep their meaning; everything else the store reports is a
/// server error.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::DuplicateEmail(_) => AppError::DuplicateUser,
            StoreError::DuplicateCategory(name) => {
                AppError::ValidationError(format!("Category '{}' already exists", name))
            }
            other => AppError::ServerError(other.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// Field-level messages set on the validation attributes win over the generic
/// validator output.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let first_message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|err| err.message.as_ref().map(|m| m.to_string()));
        AppError::ValidationError(first_message.unwrap_or_else(|| errors.to_string()))
    }
}

/// Any failure to decode or verify a JWT is an authentication failure.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("token rejected: {}", error);
        AppError::Unauthenticated
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::ServerError(format!("password hashing failed: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_error_statuses() {
        let cases = [
            (AppError::ValidationError("bad".into()), 400),
            (AppError::DuplicateUser, 400),
            (AppError::InvalidCredentials, 401),
            (AppError::Unauthenticated, 401),
            (AppError::Forbidden, 401),
            (AppError::NotFound("Task not found".into()), 404),
            (AppError::UserNotFound, 404),
            (AppError::ServerError("pool closed".into()), 500),
        ];
        for (error, status) in cases {
            assert_eq!(error.error_response().status(), status, "{}", error);
        }
    }

    #[actix_rt::test]
    async fn test_server_error_hides_detail() {
        let response =
            AppError::ServerError("connection refused on 10.0.0.3".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Server Error");
    }

    #[actix_rt::test]
    async fn test_not_owner_and_bad_token_share_status_not_body() {
        let mut bodies = Vec::new();
        for error in [AppError::Forbidden, AppError::Unauthenticated] {
            let response = error.error_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body = to_bytes(response.into_body()).await.unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            bodies.push(json["error"].as_str().unwrap().to_string());
        }
        assert_eq!(bodies, vec![FORBIDDEN.to_string(), UNAUTHENTICATED.to_string()]);
    }

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            AppError::from(StoreError::DuplicateEmail("a@b.c".into())),
            AppError::DuplicateUser
        ));
        assert!(matches!(
            AppError::from(StoreError::DuplicateCategory("Work".into())),
            AppError::ValidationError(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::Corrupt("priority 'Urgent'".into())),
            AppError::ServerError(_)
        ));
    }
}
