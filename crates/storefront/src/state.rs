//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::settings::{SettingsRepository, ShopSettings};
use crate::db::RepositoryError;
use crate::services::cloudinary::CloudinaryClient;
use crate::services::paymongo::{PaymongoClient, PaymongoError};

/// How long cached shop settings stay valid.
const SETTINGS_CACHE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    paymongo: PaymongoClient,
    cloudinary: CloudinaryClient,
    settings_cache: Cache<(), ShopSettings>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the PayMongo client cannot be constructed.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, PaymongoError> {
        let paymongo = PaymongoClient::new(&config.paymongo)?;
        let cloudinary = CloudinaryClient::new(&config.cloudinary);
        let settings_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(SETTINGS_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                paymongo,
                cloudinary,
                settings_cache,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the PayMongo client.
    #[must_use]
    pub fn paymongo(&self) -> &PaymongoClient {
        &self.inner.paymongo
    }

    /// Get a reference to the Cloudinary client.
    #[must_use]
    pub fn cloudinary(&self) -> &CloudinaryClient {
        &self.inner.cloudinary
    }

    /// The shop settings row, read through a short-TTL cache.
    ///
    /// Settings sit on the checkout and home paths, so a minute of staleness
    /// buys a round trip on every request.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the settings row cannot be loaded.
    pub async fn settings(&self) -> Result<ShopSettings, RepositoryError> {
        if let Some(settings) = self.inner.settings_cache.get(&()).await {
            return Ok(settings);
        }

        let settings = SettingsRepository::new(self.pool()).get().await?;
        self.inner.settings_cache.insert((), settings).await;
        Ok(settings)
    }

    /// Drop the cached settings after an admin change.
    pub async fn invalidate_settings(&self) {
        self.inner.settings_cache.invalidate(&()).await;
    }
}
