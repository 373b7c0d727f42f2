//! Application state shared across handlers.

use std::sync::Arc;

use souk_core::Lang;

use crate::catalog::CatalogClient;
use crate::config::SoukConfig;
use crate::services::auth::{ApiClient, AuthService};
use crate::services::orders::OrderService;
use crate::store::{LocalStore, StoreError};

/// Error creating the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to open local store: {0}")]
    Store(#[from] StoreError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the local store, API clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SoukConfig,
    store: LocalStore,
    catalog: CatalogClient,
    api: ApiClient,
    // Plain client for the order sink; the webhook is third-party and
    // never sees our auth headers.
    http: reqwest::Client,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the local store directory or an HTTP client
    /// cannot be created.
    pub fn new(config: SoukConfig) -> Result<Self, StateError> {
        let store = LocalStore::open(&config.data_dir)?;
        let catalog = CatalogClient::new(config.api_base_url.clone());
        let api = ApiClient::new(config.api_base_url.clone(), store.clone())?;
        let http = reqwest::Client::new();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                catalog,
                api,
                http,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &SoukConfig {
        &self.inner.config
    }

    /// Get a reference to the local key-value store.
    #[must_use]
    pub fn store(&self) -> &LocalStore {
        &self.inner.store
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the accounts API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Construct an auth service borrowing this state.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.api(), self.store())
    }

    /// Construct an order service borrowing this state.
    #[must_use]
    pub fn orders(&self) -> OrderService<'_> {
        OrderService::new(
            self.store(),
            self.api(),
            &self.inner.http,
            &self.inner.config.order_webhook_url,
        )
    }

    /// The active interface language.
    #[must_use]
    pub fn lang(&self) -> Lang {
        crate::locale::active(self.store(), self.inner.config.default_lang)
    }
}
