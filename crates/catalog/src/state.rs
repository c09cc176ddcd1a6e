//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::{ListingCache, MemoryCache};
use crate::config::CatalogConfig;
use crate::services::auth::TokenAuthority;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CatalogConfig,
    pool: PgPool,
    cache: Arc<dyn ListingCache>,
    tokens: TokenAuthority,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The listing cache TTL and the token signing secret both come from
    /// `config`; neither is read again after this point.
    #[must_use]
    pub fn new(config: CatalogConfig, pool: PgPool) -> Self {
        let cache = Arc::new(MemoryCache::new(config.cache_ttl));
        let tokens = TokenAuthority::new(&config.token_secret);

        Self::assemble(config, pool, cache, tokens)
    }

    /// Create application state with an injected cache and token authority.
    ///
    /// Used by tests to substitute fakes or fixed clocks.
    #[must_use]
    pub fn with_parts(
        config: CatalogConfig,
        pool: PgPool,
        cache: Arc<dyn ListingCache>,
        tokens: TokenAuthority,
    ) -> Self {
        Self::assemble(config, pool, cache, tokens)
    }

    fn assemble(
        config: CatalogConfig,
        pool: PgPool,
        cache: Arc<dyn ListingCache>,
        tokens: TokenAuthority,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                cache,
                tokens,
            }),
        }
    }

    /// Get a reference to the catalog configuration.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the listing cache.
    #[must_use]
    pub fn cache(&self) -> &dyn ListingCache {
        self.inner.cache.as_ref()
    }

    /// Get a reference to the token authority.
    #[must_use]
    pub fn tokens(&self) -> &TokenAuthority {
        &self.inner.tokens
    }
}
