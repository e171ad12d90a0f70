//! Typed client for the REST API.
//!
//! The caller owns the [`Session`] and passes it into every authenticated call; the
//! bearer token is attached in one place, [`ApiClient::authorized`]. When a call fails
//! with [`ClientError::Unauthenticated`] the caller should drop its session
//! (see [`SessionStore::clear`]) and sign in again.

pub mod session;
pub mod views;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    auth::{AuthResponse, LoginRequest, RegisterRequest},
    error::UNAUTHENTICATED,
    models::{Category, CategoryInput, ProfileUpdate, Task, TaskInput, TaskUpdate},
};

pub use session::{Session, SessionStore};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("session is missing, expired or revoked")]
    Unauthenticated,
    #[error("request failed with {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct Deleted {
    id: Uuid,
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Session {
            user: response.profile(),
            token: response.token,
        }
    }
}

/// A 401 only ends the session when the server rejected the token itself. A 401 for a
/// resource owned by someone else leaves the session intact.
fn failure(status: StatusCode, message: String, authenticated: bool) -> ClientError {
    if authenticated && status == StatusCode::UNAUTHORIZED && message == UNAUTHENTICATED {
        ClientError::Unauthenticated
    } else {
        ClientError::Api { status, message }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8080`; `/api` is appended.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn public(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    fn authorized(&self, method: Method, path: &str, session: &Session) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&session.token)
    }

    async fn send<T: DeserializeOwned>(
        request: RequestBuilder,
        authenticated: bool,
    ) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        };
        Err(failure(status, message, authenticated))
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<Session> {
        let response: AuthResponse =
            Self::send(self.public(Method::POST, "/auth/register").json(request), false).await?;
        Ok(response.into())
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse =
            Self::send(self.public(Method::POST, "/auth/login").json(&request), false).await?;
        Ok(response.into())
    }

    /// Returns the replacement session carrying the updated profile and a fresh token.
    pub async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> ClientResult<Session> {
        let request = self
            .authorized(Method::PUT, "/auth/profile", session)
            .json(update);
        let response: AuthResponse = Self::send(request, true).await?;
        Ok(response.into())
    }

    pub async fn list_tasks(&self, session: &Session) -> ClientResult<Vec<Task>> {
        Self::send(self.authorized(Method::GET, "/tasks", session), true).await
    }

    pub async fn create_task(&self, session: &Session, input: &TaskInput) -> ClientResult<Task> {
        let request = self.authorized(Method::POST, "/tasks", session).json(input);
        Self::send(request, true).await
    }

    pub async fn update_task(
        &self,
        session: &Session,
        task_id: Uuid,
        update: &TaskUpdate,
    ) -> ClientResult<Task> {
        let request = self
            .authorized(Method::PUT, &format!("/tasks/{}", task_id), session)
            .json(update);
        Self::send(request, true).await
    }

    pub async fn delete_task(&self, session: &Session, task_id: Uuid) -> ClientResult<Uuid> {
        let request = self.authorized(Method::DELETE, &format!("/tasks/{}", task_id), session);
        let deleted: Deleted = Self::send(request, true).await?;
        Ok(deleted.id)
    }

    pub async fn list_categories(&self, session: &Session) -> ClientResult<Vec<Category>> {
        Self::send(self.authorized(Method::GET, "/categories", session), true).await
    }

    pub async fn create_category(
        &self,
        session: &Session,
        input: &CategoryInput,
    ) -> ClientResult<Category> {
        let request = self
            .authorized(Method::POST, "/categories", session)
            .json(input);
        Self::send(request, true).await
    }

    pub async fn delete_category(
        &self,
        session: &Session,
        category_id: Uuid,
    ) -> ClientResult<Uuid> {
        let path = format!("/categories/{}", category_id);
        let request = self.authorized(Method::DELETE, &path, session);
        let deleted: Deleted = Self::send(request, true).await?;
        Ok(deleted.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.url("/tasks"), "http://localhost:8080/api/tasks");
    }

    #[test]
    fn test_only_token_failures_end_the_session() {
        assert!(matches!(
            failure(StatusCode::UNAUTHORIZED, UNAUTHENTICATED.to_string(), true),
            ClientError::Unauthenticated
        ));
        match failure(StatusCode::UNAUTHORIZED, "Not authorized".to_string(), true) {
            ClientError::Api { status, message } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "Not authorized");
            }
            other => panic!("expected an API error, got {:?}", other),
        }
        // Login is unauthenticated: its 401 is never a session problem.
        assert!(matches!(
            failure(StatusCode::UNAUTHORIZED, UNAUTHENTICATED.to_string(), false),
            ClientError::Api { .. }
        ));
    }

    #[test]
    fn test_bearer_token_is_attached() {
        let client = ApiClient::new("http://localhost:8080");
        let session = Session {
            token: "abc.def.ghi".to_string(),
            user: crate::models::PublicUser {
                id: Uuid::new_v4(),
                full_name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                avatar: String::new(),
            },
        };

        let request = client
            .authorized(Method::GET, "/tasks", &session)
            .build()
            .unwrap();
        assert_eq!(
            request.headers()["authorization"].to_str().unwrap(),
            "Bearer abc.def.ghi"
        );

        let request = client.public(Method::POST, "/auth/login").build().unwrap();
        assert!(request.headers().get("authorization").is_none());
    }
}
