//! Request-independent business logic. Route handlers decode HTTP, call into here, and
//! encode the result; everything here works on an [`AppState`](crate::state::AppState)
//! and plain values.

pub mod auth;
pub mod categories;
pub mod tasks;

use crate::{error::AppError, store::Owned};

impl<T> Owned<T> {
    /// Maps the store outcome onto the API's error taxonomy.
    pub fn into_result(self, what: &str) -> Result<T, AppError> {
        match self {
            Owned::Done(value) => Ok(value),
            Owned::Missing => Err(AppError::NotFound(format!("{} not found", what))),
            Owned::NotOwner => Err(AppError::Forbidden),
        }
    }
}
