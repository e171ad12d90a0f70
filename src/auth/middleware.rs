use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::{auth::AuthenticatedUser, error::AppError, models::PublicUser, state::AppState};

/// Gate for protected scopes.
///
/// Requires `Authorization: Bearer <token>`, verifies the token, resolves its subject to a
/// stored user and attaches the [`PublicUser`] to the request as [`AuthenticatedUser`].
/// Every failure is answered with the same `401`; the reason is only logged.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let user = authenticate(&req).await?;
            req.extensions_mut().insert(AuthenticatedUser(user));
            service.call(req).await
        })
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty()).then_some(token)
}

async fn authenticate(req: &ServiceRequest) -> Result<PublicUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::ServerError("AppState is not registered".into()))?;

    let Some(token) = bearer_token(req.headers()) else {
        log::debug!("no bearer token on {} {}", req.method(), req.path());
        return Err(AppError::Unauthenticated);
    };

    let claims = state.tokens.verify(token)?;

    match state.store.find_user(claims.sub).await? {
        Some(user) => Ok(user.into()),
        None => {
            log::debug!("token subject {} no longer exists", claims.sub);
            Err(AppError::Unauthenticated)
        }
    }
}
