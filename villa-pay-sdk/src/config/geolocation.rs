//! Geolocation lookup settings.

use url::Url;

/// Settings for the IP geolocation lookup.
#[derive(Debug, Clone)]
pub struct GeolocationConfig {
    /// Service root. Lookups go to `{base_url}/{ip}/json/`.
    pub base_url: Url,
}
