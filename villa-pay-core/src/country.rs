//! Calling-code detection for the phone field.
//!
//! The first detection of a browser session asks the geolocation service
//! and caches the answer in session storage; every later detection in the
//! same session is served from the cache. Failures are logged and replaced
//! by the configured default, never shown to the customer.
//!
//! A detector serving someone else's request is given that customer's
//! address with [`CountryCodeDetector::with_client_ip`] and a storage scoped
//! to them; without an address the lookup locates the caller itself.

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{debug, info};

use crate::ports::{GeoLocator, SessionStorage};

/// Session storage key of the cached calling code.
pub const DETECTED_COUNTRY_CODE_KEY: &str = "detectedCountryCode";

pub struct CountryCodeDetector {
    locator: Arc<dyn GeoLocator>,
    storage: Arc<dyn SessionStorage>,
    default_code: String,
    client_ip: Option<IpAddr>,
}

impl CountryCodeDetector {
    pub fn new(
        locator: Arc<dyn GeoLocator>,
        storage: Arc<dyn SessionStorage>,
        default_code: impl Into<String>,
    ) -> Self {
        Self {
            locator,
            storage,
            default_code: default_code.into(),
            client_ip: None,
        }
    }

    /// Locate `ip` instead of the address the lookup is sent from.
    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// The calling code to preselect.
    pub async fn detect(&self) -> String {
        if let Some(cached) = self.storage.get(DETECTED_COUNTRY_CODE_KEY) {
            debug!(calling_code = %cached, "Calling code served from session cache");
            return cached;
        }

        match self.locator.calling_code(self.client_ip).await {
            Ok(code) => {
                info!(calling_code = %code, "Calling code detected");
                self.storage.set(DETECTED_COUNTRY_CODE_KEY, code.clone());
                code
            }
            Err(e) => {
                debug!(error = %e, default = %self.default_code, "Country detection unavailable");
                self.default_code.clone()
            }
        }
    }
}
