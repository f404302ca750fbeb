//! Checkout configuration.

use crate::config::PayeeConfig;
use crate::currency::CurrencyTable;

/// Configuration handed to every [`PaymentOrchestrator`](crate::PaymentOrchestrator).
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Currency of the secondary price shown in the confirmation modal.
    pub secondary_currency: String,
    /// Currency preselected on a fresh form.
    pub default_currency: String,
    /// Calling code used when detection is unavailable.
    pub default_calling_code: String,
    /// Title used when the customer left the description empty.
    pub fallback_description: String,
    /// Known currencies and their rates.
    pub currencies: CurrencyTable,
    /// Manual transfer payee handles.
    pub payees: PayeeConfig,
}

#[cfg(test)]
pub(crate) fn test_config() -> CheckoutConfig {
    use crate::currency::Currency;
    use rust_decimal::Decimal;

    let currency = |code: &str, symbol: &str, rate: &str| Currency {
        code: code.to_string(),
        symbol: symbol.to_string(),
        rate_to_base: rate.parse::<Decimal>().unwrap(),
        decimals: 2,
    };

    CheckoutConfig {
        secondary_currency: "USD".to_string(),
        default_currency: "EUR".to_string(),
        default_calling_code: "+63".to_string(),
        fallback_description: "Payment to Boracay.house".to_string(),
        currencies: CurrencyTable::new(
            "EUR",
            vec![
                currency("EUR", "€", "1"),
                currency("USD", "$", "0.8"),
                currency("PHP", "₱", "0.016"),
                currency("RUB", "₽", "0.01"),
            ],
        )
        .unwrap(),
        payees: PayeeConfig {
            paypal: "payments@example.com".to_string(),
            gcash: "09170000000".to_string(),
            rubles: "+7 900 000-00-00".to_string(),
            revolut: "@villa".to_string(),
        },
    }
}
