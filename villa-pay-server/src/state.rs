//! Application state shared across all request handlers.

use std::net::IpAddr;
use std::sync::Arc;

use tokio::sync::RwLock;
use villa_pay_core::country::CountryCodeDetector;
use villa_pay_core::ports::{GeoLocator, MemorySessionStorage, ScopedSessionStorage};
use villa_pay_core::session::SessionAccessor;
use villa_pay_core::{Collaborators, PaymentOrchestrator};
use villa_pay_sdk::client::{AuthClient, FunctionsClient, GeoClient, RestClient};

use crate::config::RuntimeConfig;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: Arc<RwLock<RuntimeConfig>>,
    /// Detected calling codes, one scope per client address.
    pub country_cache: Arc<MemorySessionStorage>,
    /// Replaces the configured geolocation service when set.
    locator: Option<Arc<dyn GeoLocator>>,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            country_cache: Arc::new(MemorySessionStorage::new()),
            locator: None,
        }
    }

    #[cfg(test)]
    pub fn with_locator(mut self, locator: Arc<dyn GeoLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Get a read lock on the configuration.
    pub async fn config(&self) -> tokio::sync::RwLockReadGuard<'_, RuntimeConfig> {
        self.config.read().await
    }

    /// Update the configuration (used during SIGHUP reload).
    pub async fn update_config(&self, new_config: RuntimeConfig) {
        let mut config = self.config.write().await;
        *config = new_config;
    }

    /// A fresh orchestrator for one request.
    ///
    /// A forwarded bearer token authorizes the identity and table calls as
    /// the caller, so the created order carries their user id.
    pub async fn orchestrator(&self, access_token: Option<&str>) -> PaymentOrchestrator {
        let config = self.config().await;

        let mut auth = AuthClient::new(&config.backend).with_http_client(config.http.clone());
        let mut rest = RestClient::new(&config.backend).with_http_client(config.http.clone());
        if let Some(token) = access_token {
            auth = auth.with_access_token(token);
            rest = rest.with_access_token(token);
        }
        let functions = FunctionsClient::new(&config.backend).with_http_client(config.http.clone());

        PaymentOrchestrator::new(
            config.checkout.clone(),
            Collaborators {
                session: SessionAccessor::new(Arc::new(auth)),
                orders: Arc::new(rest),
                intents: Arc::new(functions),
            },
        )
    }

    /// A detector locating `client_ip`, with a cache only that address sees.
    pub async fn country_detector(&self, client_ip: IpAddr) -> CountryCodeDetector {
        let config = self.config().await;
        let locator: Arc<dyn GeoLocator> = match &self.locator {
            Some(locator) => locator.clone(),
            None => Arc::new(
                GeoClient::new(&config.geolocation).with_http_client(config.http.clone()),
            ),
        };
        let storage = ScopedSessionStorage::new(self.country_cache.clone(), client_ip.to_string());
        CountryCodeDetector::new(
            locator,
            Arc::new(storage),
            config.checkout.default_calling_code.clone(),
        )
        .with_client_ip(client_ip)
    }
}
