//! Error taxonomy of the payment page.
//!
//! Validation problems are not errors here; they are reported as
//! [`ValidationErrors`](crate::form::ValidationErrors). Everything below is
//! caught at the operation boundary that started it and turned into a
//! single user-facing message.

use thiserror::Error;

use crate::currency::CurrencyError;

pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "Payment service is temporarily unavailable. Please try again later or contact support.";
pub const NETWORK_MESSAGE: &str = "Network error. Please check your connection and try again.";
pub const NO_RESPONSE_MESSAGE: &str = "No response from payment service";
pub const ORDER_FAILED_MESSAGE: &str = "Failed to create order. Please try again.";

/// Identity service failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The service refused the request (bad credentials, expired session).
    #[error("authentication rejected: {0}")]
    Rejected(String),

    /// The service could not be reached or answered unexpectedly.
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

/// Order persistence failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("order insert rejected: {0}")]
    Rejected(String),

    #[error("order store unreachable: {0}")]
    Network(String),
}

impl PersistenceError {
    pub fn is_network(&self) -> bool {
        matches!(self, PersistenceError::Network(_))
    }
}

/// Why the hosted payment-intent function failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayFailureReason {
    /// The function is deployed without its gateway secret key.
    MissingSecretKey,
    /// The request never completed.
    Network,
    /// The function answered without a checkout URL.
    NoResponse,
    /// Any other upstream failure; the message is shown as is.
    Rejected,
}

/// Payment-intent creation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub reason: GatewayFailureReason,
    pub message: String,
}

impl GatewayError {
    pub fn new(reason: GatewayFailureReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }

    pub fn no_response() -> Self {
        Self::new(GatewayFailureReason::NoResponse, NO_RESPONSE_MESSAGE)
    }

    /// Classify an upstream error text.
    ///
    /// This is the only place upstream wording is inspected; callers match
    /// on [`GatewayFailureReason`].
    pub fn from_upstream(message: impl Into<String>) -> Self {
        let message = message.into();
        let reason = if message.contains("STRIPE_SECRET_KEY") {
            GatewayFailureReason::MissingSecretKey
        } else if message.contains("Network") {
            GatewayFailureReason::Network
        } else {
            GatewayFailureReason::Rejected
        };
        Self { reason, message }
    }

    /// Text shown to the customer.
    pub fn user_message(&self) -> String {
        match self.reason {
            GatewayFailureReason::MissingSecretKey => SERVICE_UNAVAILABLE_MESSAGE.to_string(),
            GatewayFailureReason::Network => NETWORK_MESSAGE.to_string(),
            GatewayFailureReason::NoResponse => NO_RESPONSE_MESSAGE.to_string(),
            GatewayFailureReason::Rejected => self.message.clone(),
        }
    }
}

/// Geolocation lookup failure. Never shown to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("lookup failed: {0}")]
    Lookup(String),

    #[error("lookup returned no calling code")]
    MissingCallingCode,
}

/// Clipboard write failure. Never shown to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("no clipboard available")]
    Unavailable,

    #[error("clipboard write denied: {0}")]
    Denied(String),
}

/// A failed submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Currency(#[from] CurrencyError),
}

impl CheckoutError {
    /// Message for a failed card submission.
    pub fn gateway_path_message(&self) -> String {
        match self {
            CheckoutError::Gateway(e) => e.user_message(),
            CheckoutError::Persistence(e) if e.is_network() => NETWORK_MESSAGE.to_string(),
            CheckoutError::Persistence(_) => ORDER_FAILED_MESSAGE.to_string(),
            CheckoutError::Currency(e) => e.to_string(),
        }
    }

    /// Message for a failed manual-transfer submission.
    pub fn manual_path_message(&self) -> String {
        ORDER_FAILED_MESSAGE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_classification() {
        let e = GatewayError::from_upstream("STRIPE_SECRET_KEY is not set");
        assert_eq!(e.reason, GatewayFailureReason::MissingSecretKey);
        assert_eq!(e.user_message(), SERVICE_UNAVAILABLE_MESSAGE);

        let e = GatewayError::from_upstream("NetworkError when attempting to fetch resource.");
        assert_eq!(e.reason, GatewayFailureReason::Network);
        assert_eq!(e.user_message(), NETWORK_MESSAGE);

        let e = GatewayError::from_upstream("Your card was declined.");
        assert_eq!(e.reason, GatewayFailureReason::Rejected);
        assert_eq!(e.user_message(), "Your card was declined.");
    }

    #[test]
    fn test_path_messages() {
        let persistence: CheckoutError = PersistenceError::Rejected("duplicate key".into()).into();
        assert_eq!(persistence.gateway_path_message(), ORDER_FAILED_MESSAGE);
        assert_eq!(persistence.manual_path_message(), ORDER_FAILED_MESSAGE);

        let offline: CheckoutError = PersistenceError::Network("connect refused".into()).into();
        assert_eq!(offline.gateway_path_message(), NETWORK_MESSAGE);
        assert_eq!(offline.manual_path_message(), ORDER_FAILED_MESSAGE);

        let no_url: CheckoutError = GatewayError::no_response().into();
        assert_eq!(no_url.gateway_path_message(), NO_RESPONSE_MESSAGE);
    }
}
