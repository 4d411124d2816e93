use std::sync::Arc;

use grove_core::crypto::TokenCipher;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via
/// `State<AppState>`. Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: grove_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Credential token cipher, keyed from the configured secret.
    pub cipher: Arc<TokenCipher>,
}
