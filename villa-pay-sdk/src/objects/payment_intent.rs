//! Request and reply bodies of the hosted `create-payment-intent` function.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name under which the function is deployed.
pub const CREATE_PAYMENT_INTENT: &str = "create-payment-intent";

/// Body sent to `create-payment-intent`.
///
/// `amount` is in integer minor units of `currency`, and `currency` is the
/// lowercase ISO code the customer selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntent {
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub order_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Reply of `create-payment-intent`.
///
/// `error` is an in-band failure channel, distinct from transport failures.
/// A reply with neither `url` nor `error` is also a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntentReply {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
