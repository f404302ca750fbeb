//! Identity service client.
//!
//! Speaks the GoTrue-style REST API of the backend project. The access
//! token returned by a password sign-in is kept by the client and sent as a
//! bearer token on later calls. Clones share the same token slot.

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use tokio::sync::RwLock;
use url::Url;

use super::{APIKEY_HEADER, ClientError, http_client, parse_response};
use crate::config::BackendConfig;
use crate::objects::{AuthUser, PasswordCredentials, SessionData};

/// Typed HTTP client for the identity service.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: Client,
    base_url: Url,
    anon_key: String,
    access_token: Arc<RwLock<Option<String>>>,
}

impl AuthClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            http: http_client(config),
            base_url: config.url.clone(),
            anon_key: config.anon_key.clone(),
            access_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Start from an existing session, e.g. a bearer token forwarded by a
    /// caller.
    pub fn with_access_token(self, token: impl Into<String>) -> Self {
        Self {
            access_token: Arc::new(RwLock::new(Some(token.into()))),
            ..self
        }
    }

    /// The access token of the current session, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// `POST /auth/v1/token?grant_type=password` – sign in with email and
    /// password.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionData, ClientError> {
        let mut url = self.base_url.join("/auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let resp = self
            .http
            .post(url)
            .header(APIKEY_HEADER, &self.anon_key)
            .json(&PasswordCredentials {
                email: email.to_owned(),
                password: password.to_owned(),
            })
            .send()
            .await?;

        let session: SessionData = parse_response(resp).await?;
        *self.access_token.write().await = Some(session.access_token.clone());
        Ok(session)
    }

    /// `POST /auth/v1/logout` – invalidate the current session.
    ///
    /// Signing out without a session is a no-op.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let Some(token) = self.access_token().await else {
            return Ok(());
        };

        let url = self.base_url.join("/auth/v1/logout")?;
        let resp = self
            .http
            .post(url)
            .header(APIKEY_HEADER, &self.anon_key)
            .bearer_auth(&token)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, body });
        }

        *self.access_token.write().await = None;
        Ok(())
    }

    /// `GET /auth/v1/user` – fetch the user of the current session.
    ///
    /// Returns `Ok(None)` when there is no session or the service no longer
    /// accepts the token.
    pub async fn get_user(&self) -> Result<Option<AuthUser>, ClientError> {
        let Some(token) = self.access_token().await else {
            return Ok(None);
        };

        let url = self.base_url.join("/auth/v1/user")?;
        let resp = self
            .http
            .get(url)
            .header(APIKEY_HEADER, &self.anon_key)
            .bearer_auth(&token)
            .send()
            .await?;

        if matches!(
            resp.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Ok(None);
        }

        parse_response(resp).await.map(Some)
    }
}
