//! Table access client.

use reqwest::Client;
use url::Url;

use super::{APIKEY_HEADER, ClientError, http_client, parse_response};
use crate::config::BackendConfig;
use crate::objects::{NewOrder, OrderRow};

/// Typed HTTP client for the backend's REST table API.
///
/// Requests are authorized with the caller's access token when one is set,
/// and with the anon key otherwise.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: Url,
    anon_key: String,
    access_token: Option<String>,
}

impl RestClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            http: http_client(config),
            base_url: config.url.clone(),
            anon_key: config.anon_key.clone(),
            access_token: None,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Authorize table requests as the given user.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// `POST /rest/v1/orders` – insert one order and return the stored row.
    pub async fn insert_order(&self, order: &NewOrder) -> Result<OrderRow, ClientError> {
        let url = self.base_url.join("/rest/v1/orders")?;
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);

        let resp = self
            .http
            .post(url)
            .header(APIKEY_HEADER, &self.anon_key)
            .bearer_auth(bearer)
            .header("Prefer", "return=representation")
            .json(order)
            .send()
            .await?;

        let rows: Vec<OrderRow> = parse_response(resp).await?;
        rows.into_iter().next().ok_or(ClientError::EmptyResponse)
    }
}
