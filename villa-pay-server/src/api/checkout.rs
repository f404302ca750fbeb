//! Checkout handlers. Each request runs on a fresh orchestrator.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use villa_pay_core::{PaymentMethod, PaymentOrchestrator, SubmissionOutcome};

use super::{ApiError, bearer_token};
use crate::state::AppState;

/// Amount as typed by the customer, or already numeric.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum AmountInput {
    Text(String),
    Number(Decimal),
}

/// The payment form as submitted by the page.
#[derive(Debug, Deserialize)]
pub(super) struct CheckoutRequest {
    amount: AmountInput,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    calling_code: Option<String>,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    method: Option<PaymentMethod>,
}

impl CheckoutRequest {
    async fn fill(self, orchestrator: &PaymentOrchestrator) -> Result<(), ApiError> {
        match self.amount {
            AmountInput::Text(text) => orchestrator.set_amount_input(&text).await,
            AmountInput::Number(amount) => orchestrator.set_amount(amount).await,
        }
        if let Some(currency) = self.currency {
            orchestrator.set_currency(&currency).await?;
        }
        if let Some(calling_code) = self.calling_code {
            orchestrator.set_calling_code(calling_code).await;
        }
        if let Some(method) = self.method {
            orchestrator.select_method(method).await;
        }
        orchestrator.set_description(self.description).await;
        orchestrator.set_name(self.name).await;
        orchestrator.set_email(self.email).await;
        orchestrator.set_phone_input(&self.phone).await;
        Ok(())
    }
}

fn respond(outcome: SubmissionOutcome) -> Response {
    match outcome {
        SubmissionOutcome::Redirect(url) => {
            (StatusCode::OK, Json(json!({ "redirect_url": url }))).into_response()
        }
        SubmissionOutcome::AwaitingConfirmation(confirmation) => (
            StatusCode::CREATED,
            Json(json!({ "confirmation": confirmation })),
        )
            .into_response(),
        SubmissionOutcome::Invalid(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": errors })),
        )
            .into_response(),
        SubmissionOutcome::Failed(message) => {
            (StatusCode::BAD_GATEWAY, Json(json!({ "message": message }))).into_response()
        }
        SubmissionOutcome::Busy => (
            StatusCode::CONFLICT,
            Json(json!({ "message": "A payment is already being processed" })),
        )
            .into_response(),
    }
}

/// `POST /checkout/card` — card payment through the hosted checkout.
pub(super) async fn card_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CheckoutRequest>,
) -> Result<Response, ApiError> {
    let orchestrator = state.orchestrator(bearer_token(&headers)).await;
    body.fill(&orchestrator).await?;
    orchestrator.select_method(PaymentMethod::Card).await;
    Ok(respond(orchestrator.submit_gateway_payment().await))
}

/// `POST /checkout/manual` — PayPal, GCash, rubles or Revolut transfer.
pub(super) async fn manual_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CheckoutRequest>,
) -> Result<Response, ApiError> {
    if matches!(body.method, None | Some(PaymentMethod::Card)) {
        return Err(ApiError::ManualMethodRequired);
    }
    let orchestrator = state.orchestrator(bearer_token(&headers)).await;
    body.fill(&orchestrator).await?;
    Ok(respond(orchestrator.submit_manual_payment().await))
}

/// `POST /checkout/quote` — fee summary for the submitted form.
pub(super) async fn quote(
    State(state): State<AppState>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Response, ApiError> {
    let orchestrator = state.orchestrator(None).await;
    body.fill(&orchestrator).await?;
    Ok(Json(orchestrator.price_breakdown().await?).into_response())
}
