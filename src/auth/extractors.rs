use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::{error::AppError, models::PublicUser};

/// The user resolved by `AuthMiddleware` for the current request.
///
/// Only usable on routes behind the middleware; elsewhere extraction fails with `401`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub PublicUser);

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                log::warn!("{} reached without AuthMiddleware", req.path());
                ready(Err(AppError::Unauthenticated.into()))
            }
        }
    }
}
