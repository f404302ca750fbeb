//! Page support endpoints.

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use tracing::debug;

use super::extractors::ClientIp;
use crate::state::AppState;

/// `GET /instagram-auth.json`
pub(super) async fn instagram_auth() -> impl IntoResponse {
    Json(json!({ "success": true }))
}

/// `GET /payees` — where manual transfers are sent.
pub(super) async fn payees(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config().await;
    Json(config.checkout.payees.clone())
}

/// `GET /country-code` — calling code for the phone field, located from the
/// requesting customer's address and cached per address.
pub(super) async fn country_code(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
) -> impl IntoResponse {
    let calling_code = match ip {
        Some(ip) => state.country_detector(ip).await.detect().await,
        None => {
            debug!("Client address unknown, serving the default calling code");
            state.config().await.checkout.default_calling_code.clone()
        }
    };
    Json(json!({ "calling_code": calling_code }))
}
