//! Payee handles for manual transfers.

use serde::Serialize;

use crate::channel::TransferChannel;

/// Where customers send manual transfers, one handle per channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayeeConfig {
    /// PayPal account email.
    pub paypal: String,
    /// GCash mobile number.
    pub gcash: String,
    /// WhatsApp number handling ruble transfers.
    pub rubles: String,
    /// Revolut tag.
    pub revolut: String,
}

impl PayeeConfig {
    pub fn handle(&self, channel: TransferChannel) -> &str {
        match channel {
            TransferChannel::Paypal => &self.paypal,
            TransferChannel::Gcash => &self.gcash,
            TransferChannel::Rubles => &self.rubles,
            TransferChannel::Revolut => &self.revolut,
        }
    }
}
