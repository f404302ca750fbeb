//! HTTP API handlers.
//!
//! # Endpoints
//!
//! - `POST /checkout/card`        – store a pending order and return the hosted checkout URL
//! - `POST /checkout/manual`      – store an order awaiting a manual transfer
//! - `POST /checkout/quote`       – processing fee and totals for a form
//! - `GET  /payees`               – payee handles per transfer channel
//! - `GET  /country-code`         – calling code to preselect
//! - `GET  /instagram-auth.json`  – static `{"success":true}`

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use villa_pay_core::currency::CurrencyError;
use villa_pay_core::orchestrator::MANUAL_METHOD_REQUIRED_MESSAGE;

use crate::state::AppState;

mod checkout;
mod extractors;
mod page;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checkout/card", post(checkout::card_checkout))
        .route("/checkout/manual", post(checkout::manual_checkout))
        .route("/checkout/quote", post(checkout::quote))
        .route("/payees", get(page::payees))
        .route("/country-code", get(page::country_code))
        .route("/instagram-auth.json", get(page::instagram_auth))
}

/// Bearer token from the `Authorization` header, if any.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Errors raised before a submission starts.
#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    #[error("manual payment method required")]
    ManualMethodRequired,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            ApiError::Currency(e) => e.to_string(),
            ApiError::ManualMethodRequired => MANUAL_METHOD_REQUIRED_MESSAGE.to_string(),
        };
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sample_runtime_config;
    use crate::server::build_router;
    use axum::body::{Body, to_bytes};
    use async_trait::async_trait;
    use axum::http::Request;
    use serde_json::Value;
    use std::net::IpAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;
    use villa_pay_core::error::GeolocationError;
    use villa_pay_core::ports::GeoLocator;

    fn app() -> Router {
        build_router(AppState::new(sample_runtime_config()))
    }

    async fn call(request: Request<Body>) -> (StatusCode, Value) {
        call_app(app(), request).await
    }

    async fn call_app(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_instagram_auth_is_static() {
        let (status, body) = call(
            Request::get("/api/instagram-auth.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));
    }

    #[tokio::test]
    async fn test_payees_listing() {
        let (status, body) = call(Request::get("/api/payees").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["gcash"], "09171234567");
        assert_eq!(body["revolut"], "@boracayhouse");
    }

    #[tokio::test]
    async fn test_invalid_card_form_is_unprocessable() {
        let (status, body) = call(post_json(
            "/api/checkout/card",
            json!({ "amount": "abc", "email": "not-an-email", "phone": "12" }),
        ))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["amount"], "Please enter a valid amount greater than 0");
        assert_eq!(body["errors"]["email"], "Please enter a valid email address");
        assert_eq!(body["errors"]["phone"], "WhatsApp number must be 7-15 digits");
    }

    #[tokio::test]
    async fn test_unknown_currency_is_unprocessable() {
        let (status, body) = call(post_json(
            "/api/checkout/quote",
            json!({ "amount": 10, "currency": "XYZ" }),
        ))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "unknown currency: XYZ");
    }

    #[tokio::test]
    async fn test_manual_checkout_needs_transfer_method() {
        let (status, body) = call(post_json(
            "/api/checkout/manual",
            json!({ "amount": 10, "method": "stripe" }),
        ))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], MANUAL_METHOD_REQUIRED_MESSAGE);
    }

    #[tokio::test]
    async fn test_quote_for_paypal() {
        let (status, body) = call(post_json(
            "/api/checkout/quote",
            json!({ "amount": "1000", "currency": "PHP", "method": "paypal" }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["formatted_surcharge"], "₱50.00");
        assert_eq!(body["formatted_total"], "₱1,050.00");
    }

    #[tokio::test]
    async fn test_oversized_amount_is_refused() {
        let amount = "79228162514264337593543950335";
        let (status, body) = call(post_json(
            "/api/checkout/quote",
            json!({ "amount": amount, "currency": "EUR", "method": "paypal" }),
        ))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], format!("amount {amount} is too large"));

        let (status, body) = call(post_json(
            "/api/checkout/card",
            json!({
                "amount": amount,
                "currency": "EUR",
                "description": "Booking deposit",
                "name": "Jane Doe",
                "email": "jane@example.com",
                "phone": "9171234567",
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], format!("amount {amount} is too large"));
    }

    /// Locates two documentation addresses and counts lookups.
    #[derive(Default)]
    struct ByAddress {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GeoLocator for ByAddress {
        async fn calling_code(&self, ip: Option<IpAddr>) -> Result<String, GeolocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match ip.map(|ip| ip.to_string()).as_deref() {
                Some("203.0.113.9") => Ok("+81".to_string()),
                Some("198.51.100.4") => Ok("+49".to_string()),
                _ => Err(GeolocationError::MissingCallingCode),
            }
        }
    }

    fn country_code_from(forwarded_for: &str) -> Request<Body> {
        Request::get("/api/country-code")
            .header(extractors::FORWARDED_FOR_HEADER, forwarded_for)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_country_code_per_client() {
        let locator = Arc::new(ByAddress::default());
        let app = build_router(AppState::new(sample_runtime_config()).with_locator(locator.clone()));

        let (status, body) = call_app(app.clone(), country_code_from("203.0.113.9")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["calling_code"], "+81");

        let (_, body) = call_app(app.clone(), country_code_from("198.51.100.4, 10.0.0.1")).await;
        assert_eq!(body["calling_code"], "+49");

        // the first customer is served from their own cache entry
        let (_, body) = call_app(app.clone(), country_code_from("203.0.113.9")).await;
        assert_eq!(body["calling_code"], "+81");
        assert_eq!(locator.calls.load(Ordering::SeqCst), 2);

        // no address, no lookup
        let (_, body) = call_app(
            app,
            Request::get("/api/country-code").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(body["calling_code"], "+63");
        assert_eq!(locator.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));
        headers.insert(header::AUTHORIZATION, "Basic Zm9v".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
