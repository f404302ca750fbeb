//! Static currency table: conversion, display formatting and minor units.
//!
//! Rates are expressed against the base currency: one unit of a currency is
//! worth `rate_to_base` units of the base currency. Conversions between two
//! non-base currencies go through the base.

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Errors raised by the currency table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    #[error("unknown currency: {0}")]
    Unknown(String),

    #[error("currency {0} has a non-positive rate")]
    InvalidRate(String),

    #[error("base currency {0} is not in the table")]
    MissingBase(String),

    #[error("amount out of range for {0}")]
    OutOfRange(String),

    #[error("amount {0} is too large")]
    AmountTooLarge(Decimal),
}

/// One supported currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    /// ISO 4217 code, upper case.
    pub code: String,
    /// Display symbol (e.g. `€`).
    pub symbol: String,
    /// Value of one unit in the base currency.
    pub rate_to_base: Decimal,
    /// Number of minor-unit digits (2 for cents).
    pub decimals: u32,
}

#[derive(Debug, Clone)]
pub struct CurrencyTable {
    base: String,
    currencies: HashMap<String, Currency>,
}

impl CurrencyTable {
    /// Build a table. The base currency must be present, and every rate
    /// must be positive.
    pub fn new(base: impl Into<String>, currencies: Vec<Currency>) -> Result<Self, CurrencyError> {
        let base = base.into().to_ascii_uppercase();
        let mut table = HashMap::with_capacity(currencies.len());
        for mut currency in currencies {
            currency.code = currency.code.to_ascii_uppercase();
            if currency.rate_to_base <= Decimal::ZERO {
                return Err(CurrencyError::InvalidRate(currency.code));
            }
            table.insert(currency.code.clone(), currency);
        }
        if !table.contains_key(&base) {
            return Err(CurrencyError::MissingBase(base));
        }
        Ok(Self {
            base,
            currencies: table,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Look up a currency by code, ignoring case.
    pub fn get(&self, code: &str) -> Result<&Currency, CurrencyError> {
        self.currencies
            .get(&code.to_ascii_uppercase())
            .ok_or_else(|| CurrencyError::Unknown(code.to_string()))
    }

    /// Currencies sorted by code, for building selectors.
    pub fn currencies(&self) -> Vec<&Currency> {
        let mut list: Vec<&Currency> = self.currencies.values().collect();
        list.sort_by(|a, b| a.code.cmp(&b.code));
        list
    }

    /// Convert `amount` from one currency to another, rounded to the target
    /// currency's minor unit.
    pub fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Decimal, CurrencyError> {
        let from = self.get(from)?;
        let to = self.get(to)?;
        let converted = if from.code == to.code {
            amount
        } else {
            amount
                .checked_mul(from.rate_to_base)
                .and_then(|base| base.checked_div(to.rate_to_base))
                .ok_or_else(|| CurrencyError::OutOfRange(to.code.clone()))?
        };
        Ok(converted.round_dp_with_strategy(to.decimals, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Integer amount in the currency's smallest denomination, rounded to
    /// nearest with halves away from zero.
    pub fn to_minor_units(&self, amount: Decimal, code: &str) -> Result<i64, CurrencyError> {
        let currency = self.get(code)?;
        let factor = Decimal::from(10u64.pow(currency.decimals));
        amount
            .checked_mul(factor)
            .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|minor| minor.to_i64())
            .ok_or_else(|| CurrencyError::OutOfRange(currency.code.clone()))
    }

    /// Render an amount with the currency symbol and grouped thousands,
    /// e.g. `€1,234.50`. Unknown codes fall back to `CODE 1,234.50`.
    pub fn format(&self, amount: Decimal, code: &str) -> String {
        match self.get(code) {
            Ok(currency) => {
                let digits = group_thousands(amount, currency.decimals);
                match digits.strip_prefix('-') {
                    Some(abs) => format!("-{}{}", currency.symbol, abs),
                    None => format!("{}{}", currency.symbol, digits),
                }
            }
            Err(_) => format!("{} {}", code.to_ascii_uppercase(), group_thousands(amount, 2)),
        }
    }
}

fn group_thousands(amount: Decimal, decimals: u32) -> String {
    let rounded = amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.*}", decimals as usize, rounded);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_convert_through_base() {
        let table = test_config().currencies;
        assert_eq!(table.convert(dec("50"), "USD", "EUR").unwrap(), dec("40.00"));
        assert_eq!(table.convert(dec("105"), "EUR", "EUR").unwrap(), dec("105"));
        // 1000 PHP = 16 EUR = 20 USD
        assert_eq!(table.convert(dec("1000"), "php", "usd").unwrap(), dec("20.00"));
    }

    #[test]
    fn test_convert_unknown_currency() {
        let table = test_config().currencies;
        assert_eq!(
            table.convert(dec("1"), "XYZ", "EUR"),
            Err(CurrencyError::Unknown("XYZ".to_string()))
        );
    }

    #[test]
    fn test_minor_units_round_half_away_from_zero() {
        let table = test_config().currencies;
        assert_eq!(table.to_minor_units(dec("105"), "EUR").unwrap(), 10500);
        assert_eq!(table.to_minor_units(dec("10.005"), "EUR").unwrap(), 1001);
        assert_eq!(table.to_minor_units(dec("10.0049"), "EUR").unwrap(), 1000);
    }

    #[test]
    fn test_format() {
        let table = test_config().currencies;
        assert_eq!(table.format(dec("105"), "EUR"), "€105.00");
        assert_eq!(table.format(dec("1234567.5"), "USD"), "$1,234,567.50");
        assert_eq!(table.format(dec("999.999"), "PHP"), "₱1,000.00");
        assert_eq!(table.format(dec("-12.5"), "EUR"), "-€12.50");
        assert_eq!(table.format(dec("3"), "xyz"), "XYZ 3.00");
    }

    #[test]
    fn test_table_validation() {
        let eur = Currency {
            code: "eur".to_string(),
            symbol: "€".to_string(),
            rate_to_base: Decimal::ONE,
            decimals: 2,
        };
        assert!(CurrencyTable::new("EUR", vec![eur.clone()]).is_ok());
        assert_eq!(
            CurrencyTable::new("USD", vec![eur.clone()]).unwrap_err(),
            CurrencyError::MissingBase("USD".to_string())
        );
        let broken = Currency {
            rate_to_base: Decimal::ZERO,
            ..eur
        };
        assert_eq!(
            CurrencyTable::new("EUR", vec![broken]).unwrap_err(),
            CurrencyError::InvalidRate("EUR".to_string())
        );
    }
}
