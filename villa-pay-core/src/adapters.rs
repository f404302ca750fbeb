//! Port implementations over the SDK HTTP clients.
//!
//! SDK failures are classified here, once, into the error types the
//! orchestration matches on.

use std::net::IpAddr;

use async_trait::async_trait;
use villa_pay_sdk::client::{AuthClient, ClientError, FunctionsClient, GeoClient, RestClient};
use villa_pay_sdk::objects::{
    AuthErrorBody, AuthUser, CreatePaymentIntent, NewOrder, OrderRow, PaymentIntentReply,
    SessionData,
};

use crate::error::{AuthError, GatewayError, GatewayFailureReason, GeolocationError, PersistenceError};
use crate::ports::{GeoLocator, IdentityService, OrderStore, PaymentIntents};

fn auth_error(e: ClientError) -> AuthError {
    match e {
        ClientError::Api { status, body } if status.is_client_error() => {
            let message = serde_json::from_str::<AuthErrorBody>(&body)
                .ok()
                .and_then(|parsed| parsed.message().map(str::to_string))
                .unwrap_or(body);
            AuthError::Rejected(message)
        }
        other => AuthError::Unavailable(other.to_string()),
    }
}

fn persistence_error(e: ClientError) -> PersistenceError {
    if e.is_network() {
        PersistenceError::Network(e.to_string())
    } else {
        PersistenceError::Rejected(e.to_string())
    }
}

fn gateway_error(e: ClientError) -> GatewayError {
    if e.is_network() {
        return GatewayError::new(GatewayFailureReason::Network, e.to_string());
    }
    let detail = match e {
        ClientError::Api { body, .. } => serde_json::from_str::<PaymentIntentReply>(&body)
            .ok()
            .and_then(|reply| reply.error)
            .unwrap_or(body),
        other => other.to_string(),
    };
    GatewayError::from_upstream(format!("Payment service error: {detail}"))
}

#[async_trait]
impl IdentityService for AuthClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionData, AuthError> {
        AuthClient::sign_in_with_password(self, email, password)
            .await
            .map_err(auth_error)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        AuthClient::sign_out(self).await.map_err(auth_error)
    }

    async fn get_user(&self) -> Result<Option<AuthUser>, AuthError> {
        AuthClient::get_user(self).await.map_err(auth_error)
    }
}

#[async_trait]
impl OrderStore for RestClient {
    async fn insert_order(&self, order: NewOrder) -> Result<OrderRow, PersistenceError> {
        RestClient::insert_order(self, &order)
            .await
            .map_err(persistence_error)
    }
}

#[async_trait]
impl PaymentIntents for FunctionsClient {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntent,
    ) -> Result<PaymentIntentReply, GatewayError> {
        FunctionsClient::create_payment_intent(self, &request)
            .await
            .map_err(gateway_error)
    }
}

#[async_trait]
impl GeoLocator for GeoClient {
    async fn calling_code(&self, ip: Option<IpAddr>) -> Result<String, GeolocationError> {
        let lookup = self
            .lookup(ip)
            .await
            .map_err(|e| GeolocationError::Lookup(e.to_string()))?;
        lookup
            .calling_code()
            .map(str::to_string)
            .ok_or(GeolocationError::MissingCallingCode)
    }
}
