#![doc = "The `taskmaster` library crate."]
#![doc = ""]
#![doc = "A personal task manager: accounts with bearer-token authentication, per-user tasks"]
#![doc = "and categories behind an actix-web REST API, pluggable storage (Postgres or memory),"]
#![doc = "and a typed client for the API. The binary in `main.rs` wires these together."]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use crate::config::Config;
pub use crate::error::AppError;
pub use crate::state::AppState;
