pub mod auth;
pub mod categories;
pub mod health;
pub mod tasks;

use actix_web::{error, web, HttpRequest};

use crate::{auth::AuthMiddleware, error::AppError};

/// Malformed or unexpected JSON bodies become `400` with the usual error body.
fn json_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejected body for {}: {}", req.path(), err);
    AppError::ValidationError(format!("Invalid request body: {}", err)).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejected path parameter: {}", err);
    AppError::ValidationError("Invalid id".to_string()).into()
}

/// Mounts the API under whatever scope the caller provides (`/api` in the binary).
///
/// `/auth/register` and `/auth/login` are public; everything else sits behind
/// `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(
            web::scope("/auth/profile")
                .wrap(AuthMiddleware)
                .service(auth::update_profile),
        )
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        )
        .service(
            web::scope("/categories")
                .wrap(AuthMiddleware)
                .service(categories::list_categories)
                .service(categories::create_category)
                .service(categories::delete_category),
        );
}
