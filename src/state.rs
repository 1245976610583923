//! Application state for Axum web framework.

use crate::config::JwtConfig;
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// Shared services accessible from every handler.
///
/// Cloning is cheap: services hold their repositories behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
}

impl AppState {
    /// Creates state backed by PostgreSQL repositories sharing `pool`.
    ///
    /// # Example
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let state = AppState::new(pool, settings.jwt.clone());
    /// ```
    pub fn new(pool: AsyncDbPool, jwt_config: JwtConfig) -> Self {
        Self::from_repositories(Repositories::postgres(pool), jwt_config)
    }

    /// Creates state over arbitrary repositories, e.g. [`Repositories::in_memory`].
    pub fn from_repositories(repos: Repositories, jwt_config: JwtConfig) -> Self {
        Self {
            services: Services::new(repos, jwt_config),
        }
    }
}
