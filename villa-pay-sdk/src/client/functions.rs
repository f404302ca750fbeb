//! Edge function client.

use reqwest::Client;
use url::Url;

use super::{APIKEY_HEADER, ClientError, http_client, parse_response};
use crate::config::BackendConfig;
use crate::objects::payment_intent::{CREATE_PAYMENT_INTENT, CreatePaymentIntent, PaymentIntentReply};

/// Typed HTTP client for the backend's hosted functions.
#[derive(Debug, Clone)]
pub struct FunctionsClient {
    http: Client,
    base_url: Url,
    anon_key: String,
}

impl FunctionsClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            http: http_client(config),
            base_url: config.url.clone(),
            anon_key: config.anon_key.clone(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /functions/v1/create-payment-intent` – create a hosted checkout
    /// session for an order.
    ///
    /// A 2xx reply may still carry an in-band `error`; that is left to the
    /// caller to interpret.
    pub async fn create_payment_intent(
        &self,
        body: &CreatePaymentIntent,
    ) -> Result<PaymentIntentReply, ClientError> {
        let url = self
            .base_url
            .join(&format!("/functions/v1/{CREATE_PAYMENT_INTENT}"))?;

        let resp = self
            .http
            .post(url)
            .header(APIKEY_HEADER, &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(body)
            .send()
            .await?;

        parse_response(resp).await
    }
}
