//! Backend-as-a-service connection settings.

use std::time::Duration;
use url::Url;

/// Connection settings for the backend-as-a-service project.
///
/// The same project hosts the identity service, the `orders` table and the
/// edge functions, so all three clients are built from one of these.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project root URL (e.g. `https://abc.supabase.co`).
    pub url: Url,
    /// Public anon key sent as the `apikey` header on every request.
    pub anon_key: String,
    /// Per-request timeout applied to the HTTP client.
    pub timeout: Duration,
}

impl BackendConfig {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(url: Url, anon_key: impl Into<String>) -> Self {
        Self {
            url,
            anon_key: anon_key.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
