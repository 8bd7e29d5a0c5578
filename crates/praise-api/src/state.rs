use std::sync::Arc;

use anyhow::Result;
use praise_db::Database;

use crate::config::Config;
use crate::error::ApiError;
use crate::password::Hasher;
use crate::token::TokenService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenService,
    pub hasher: Hasher,
}

impl AppStateInner {
    pub fn new(db: Database, config: &Config) -> Result<Self> {
        Ok(Self {
            db,
            tokens: TokenService::new(&config.jwt_secret, config.jwt_algorithm, config.token_ttl),
            hasher: Hasher::production()?,
        })
    }
}

/// Run store work (and password hashing) off the async runtime.
///
/// The closure runs to completion even if the calling request is dropped, so
/// a transaction started inside it always either commits or rolls back.
pub async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| ApiError::Internal(format!("spawn_blocking join error: {}", e)))?
}
