//! Processing fee rules.
//!
//! Card and PayPal payments carry a 5% processing fee. GCash, ruble and
//! Revolut transfers carry none.

use rust_decimal::Decimal;
use serde::Serialize;
use villa_pay_sdk::objects::PaymentMethod;

use crate::currency::{CurrencyError, CurrencyTable};

/// 5%.
pub const SURCHARGE_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Processing fee for `amount` paid with `method`.
pub fn surcharge(method: PaymentMethod, amount: Decimal) -> Result<Decimal, CurrencyError> {
    match method {
        PaymentMethod::Card | PaymentMethod::Paypal => amount
            .checked_mul(SURCHARGE_RATE)
            .ok_or(CurrencyError::AmountTooLarge(amount)),
        PaymentMethod::Gcash | PaymentMethod::Rubles | PaymentMethod::Revolut => Ok(Decimal::ZERO),
    }
}

/// Amount plus the method's processing fee.
pub fn total_with_surcharge(
    method: PaymentMethod,
    amount: Decimal,
) -> Result<Decimal, CurrencyError> {
    amount
        .checked_add(surcharge(method, amount)?)
        .ok_or(CurrencyError::AmountTooLarge(amount))
}

/// The amount / fee / total summary shown under each payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub surcharge: Decimal,
    pub total: Decimal,
    pub formatted_subtotal: String,
    pub formatted_surcharge: String,
    pub formatted_total: String,
}

impl PriceBreakdown {
    pub fn new(
        method: PaymentMethod,
        amount: Decimal,
        currency: &str,
        table: &CurrencyTable,
    ) -> Result<Self, CurrencyError> {
        let surcharge = surcharge(method, amount)?;
        let total = total_with_surcharge(method, amount)?;
        Ok(Self {
            subtotal: amount,
            surcharge,
            total,
            formatted_subtotal: table.format(amount, currency),
            formatted_surcharge: table.format(surcharge, currency),
            formatted_total: table.format(total, currency),
        })
    }
}
