//! TOML file configuration structures.
//!
//! These structs directly map to the `villa-pay.toml` file format.

use std::net::SocketAddr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;
use villa_pay_sdk::objects::geo::IPAPI_BASE_URL;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub checkout: CheckoutConfig,
    pub currencies: Vec<CurrencyConfig>,
    pub payees: PayeesConfig,
    #[serde(default)]
    pub geolocation: GeolocationConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Backend project section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project root URL.
    pub url: Url,
    /// Public anon key. Overridden by `VILLA_PAY_ANON_KEY` when set.
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Checkout defaults section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    pub base_currency: String,
    #[serde(default = "default_secondary_currency")]
    pub secondary_currency: String,
    pub default_currency: String,
    pub default_calling_code: String,
    pub fallback_description: String,
}

fn default_secondary_currency() -> String {
    "USD".to_string()
}

/// One `[[currencies]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub code: String,
    pub symbol: String,
    /// Value of one unit in the base currency.
    pub rate_to_base: Decimal,
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

fn default_decimals() -> u32 {
    2
}

/// Manual transfer payee handles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayeesConfig {
    pub paypal: String,
    pub gcash: String,
    pub rubles: String,
    pub revolut: String,
}

/// Geolocation lookup section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    #[serde(default = "default_geolocation_url")]
    pub url: String,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            url: default_geolocation_url(),
        }
    }
}

fn default_geolocation_url() -> String {
    IPAPI_BASE_URL.to_string()
}

#[cfg(test)]
pub(crate) const SAMPLE: &str = r#"
[server]
listen = "127.0.0.1:3000"

[backend]
url = "https://project.supabase.co"
anon_key = "anon"

[checkout]
base_currency = "EUR"
default_currency = "EUR"
default_calling_code = "+63"
fallback_description = "Payment to Boracay.house"

[[currencies]]
code = "EUR"
symbol = "€"
rate_to_base = "1"

[[currencies]]
code = "USD"
symbol = "$"
rate_to_base = "0.92"

[[currencies]]
code = "PHP"
symbol = "₱"
rate_to_base = "0.016"

[payees]
paypal = "payments@boracay.house"
gcash = "09171234567"
rubles = "+7 900 123-45-67"
revolut = "@boracayhouse"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parsing() {
        let config: FileConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.checkout.secondary_currency, "USD");
        assert_eq!(config.currencies.len(), 3);
        assert_eq!(config.currencies[1].rate_to_base, "0.92".parse::<Decimal>().unwrap());
        assert_eq!(config.currencies[2].decimals, 2);
        assert_eq!(config.geolocation.url, IPAPI_BASE_URL);
    }

    #[test]
    fn test_missing_payees_is_rejected() {
        let without_payees = SAMPLE.split("[payees]").next().unwrap();
        assert!(toml::from_str::<FileConfig>(without_payees).is_err());
    }
}
