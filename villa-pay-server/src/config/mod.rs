//! Configuration module for villa-pay-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use url::Url;
use villa_pay_core::config::{CheckoutConfig, PayeeConfig};
use villa_pay_core::currency::{Currency, CurrencyError, CurrencyTable};
use villa_pay_sdk::client::http_client;
use villa_pay_sdk::config::{BackendConfig, GeolocationConfig};

use crate::config::file::FileConfig;

/// Environment variable overriding `backend.anon_key`.
pub const ANON_KEY_ENV: &str = "VILLA_PAY_ANON_KEY";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid currency table: {0}")]
    CurrencyError(#[from] CurrencyError),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Validated configuration the handlers run with.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub listen: SocketAddr,
    pub backend: BackendConfig,
    pub geolocation: GeolocationConfig,
    pub checkout: Arc<CheckoutConfig>,
    /// Shared by every backend client built for a request.
    pub http: reqwest::Client,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI and environment overrides
    /// 3. Validate and build the runtime configuration
    pub fn load(&self) -> Result<RuntimeConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }
        if let Ok(anon_key) = std::env::var(ANON_KEY_ENV) {
            file_config.backend.anon_key = anon_key;
        }

        build_runtime_config(file_config)
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<RuntimeConfig, ConfigError> {
        self.load()
    }
}

fn build_runtime_config(file: FileConfig) -> Result<RuntimeConfig, ConfigError> {
    if file.backend.anon_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "backend.anon_key is empty and {ANON_KEY_ENV} is not set"
        )));
    }
    if !matches!(file.backend.url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "backend.url must be http(s), got {}",
            file.backend.url
        )));
    }
    if file.checkout.fallback_description.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "checkout.fallback_description is empty".to_string(),
        ));
    }
    if !file.checkout.default_calling_code.starts_with('+') {
        return Err(ConfigError::ValidationError(format!(
            "checkout.default_calling_code must start with '+', got {}",
            file.checkout.default_calling_code
        )));
    }

    let currencies = CurrencyTable::new(
        file.checkout.base_currency.clone(),
        file.currencies
            .into_iter()
            .map(|c| Currency {
                code: c.code,
                symbol: c.symbol,
                rate_to_base: c.rate_to_base,
                decimals: c.decimals,
            })
            .collect(),
    )?;
    // Unknown codes fail here rather than on the first submission.
    let secondary_currency = currencies.get(&file.checkout.secondary_currency)?.code.clone();
    let default_currency = currencies.get(&file.checkout.default_currency)?.code.clone();

    let geolocation_url = Url::parse(&file.geolocation.url)
        .ok()
        .filter(|url| !url.cannot_be_a_base())
        .ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "geolocation.url is not a valid service root: {}",
                file.geolocation.url
            ))
        })?;

    let backend = BackendConfig::new(file.backend.url, file.backend.anon_key)
        .with_timeout(Duration::from_secs(file.backend.timeout_secs));
    let http = http_client(&backend);

    Ok(RuntimeConfig {
        listen: file.server.listen,
        backend,
        geolocation: GeolocationConfig {
            base_url: geolocation_url,
        },
        checkout: Arc::new(CheckoutConfig {
            secondary_currency,
            default_currency,
            default_calling_code: file.checkout.default_calling_code,
            fallback_description: file.checkout.fallback_description,
            currencies,
            payees: PayeeConfig {
                paypal: file.payees.paypal,
                gcash: file.payees.gcash,
                rubles: file.payees.rubles,
                revolut: file.payees.revolut,
            },
        }),
        http,
    })
}

#[cfg(test)]
pub(crate) fn sample_runtime_config() -> RuntimeConfig {
    let file: FileConfig = toml::from_str(file::SAMPLE).unwrap();
    build_runtime_config(file).unwrap()
}
