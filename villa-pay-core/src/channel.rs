//! Manual transfer channels.

use serde::{Deserialize, Serialize};
use villa_pay_sdk::objects::PaymentMethod;

/// A payment method settled by a manual transfer reviewed by staff.
///
/// Every method except the card path is a transfer channel. Each channel has
/// its own payee handle and its own clipboard acknowledgement flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferChannel {
    Paypal,
    Gcash,
    Rubles,
    Revolut,
}

impl TransferChannel {
    pub const ALL: [TransferChannel; 4] = [
        TransferChannel::Paypal,
        TransferChannel::Gcash,
        TransferChannel::Rubles,
        TransferChannel::Revolut,
    ];

    /// The channel behind a payment method, `None` for the card path.
    pub fn from_method(method: PaymentMethod) -> Option<Self> {
        match method {
            PaymentMethod::Card => None,
            PaymentMethod::Paypal => Some(TransferChannel::Paypal),
            PaymentMethod::Gcash => Some(TransferChannel::Gcash),
            PaymentMethod::Rubles => Some(TransferChannel::Rubles),
            PaymentMethod::Revolut => Some(TransferChannel::Revolut),
        }
    }

    pub fn method(self) -> PaymentMethod {
        match self {
            TransferChannel::Paypal => PaymentMethod::Paypal,
            TransferChannel::Gcash => PaymentMethod::Gcash,
            TransferChannel::Rubles => PaymentMethod::Rubles,
            TransferChannel::Revolut => PaymentMethod::Revolut,
        }
    }
}

impl From<TransferChannel> for PaymentMethod {
    fn from(channel: TransferChannel) -> Self {
        channel.method()
    }
}

impl std::fmt::Display for TransferChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.method().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_is_not_a_channel() {
        assert_eq!(TransferChannel::from_method(PaymentMethod::Card), None);
        for channel in TransferChannel::ALL {
            assert_eq!(TransferChannel::from_method(channel.method()), Some(channel));
        }
    }
}
