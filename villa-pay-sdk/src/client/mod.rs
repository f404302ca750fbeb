//! HTTP clients for the payment page collaborators.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod auth;
mod functions;
mod geo;
mod rest;

pub use auth::AuthClient;
pub use functions::FunctionsClient;
pub use geo::GeoClient;
pub use rest::RestClient;

pub use reqwest::StatusCode;

use reqwest::Client;

use crate::config::BackendConfig;

/// Header carrying the project anon key.
pub const APIKEY_HEADER: &str = "apikey";

/// Errors produced by the SDK HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// A representation was requested but the server returned none.
    #[error("empty response")]
    EmptyResponse,
}

impl ClientError {
    /// Whether the failure happened below the HTTP layer.
    pub fn is_network(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }
}

/// Build the HTTP client used by the backend clients.
pub fn http_client(config: &BackendConfig) -> Client {
    Client::builder()
        .timeout(config.timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
