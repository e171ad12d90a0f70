use std::sync::Arc;

use chrono::Duration;

use crate::{auth::TokenKeys, config::Config, store::Store};

/// Shared application state, registered once with `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenKeys,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: TokenKeys, bcrypt_cost: u32) -> Self {
        Self {
            store,
            tokens,
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &Config, store: Arc<dyn Store>) -> Self {
        let tokens = TokenKeys::new(
            config.jwt_secret.as_bytes(),
            Duration::days(config.jwt_expires_in_days),
        );
        Self::new(store, tokens, config.bcrypt_cost)
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory state with a fixed secret and the cheapest bcrypt cost.
    pub(crate) fn for_tests() -> Self {
        Self::new(
            Arc::new(crate::store::MemoryStore::new()),
            TokenKeys::new(b"unit-test-secret", Duration::days(30)),
            4,
        )
    }
}
