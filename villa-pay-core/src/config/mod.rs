//! Runtime configuration for the payment page.
//!
//! The orchestrator reads currencies, defaults and payee handles from
//! [`CheckoutConfig`] only. Loading it from a file is handled by the server
//! crate.

mod checkout;
mod payees;

pub use checkout::CheckoutConfig;
pub use payees::PayeeConfig;

#[cfg(test)]
pub(crate) use checkout::test_config;
