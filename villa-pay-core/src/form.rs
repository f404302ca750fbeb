//! Payment form input and validation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use villa_pay_sdk::objects::PaymentMethod;

use crate::config::CheckoutConfig;

/// The fields a customer fills in on the payment page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentForm {
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub name: String,
    pub email: String,
    /// International calling code including the `+`, e.g. `+63`.
    pub calling_code: String,
    /// Local WhatsApp number, digits only.
    pub phone: String,
    pub method: PaymentMethod,
}

impl PaymentForm {
    /// A fresh form with the configured defaults and the card tab active.
    pub fn new(config: &CheckoutConfig) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency: config.default_currency.clone(),
            description: String::new(),
            name: String::new(),
            email: String::new(),
            calling_code: config.default_calling_code.clone(),
            phone: String::new(),
            method: PaymentMethod::Card,
        }
    }

    /// Calling code and local number concatenated, as stored with orders.
    pub fn customer_whatsapp(&self) -> String {
        format!("{}{}", self.calling_code, self.phone.trim())
    }
}

/// Parse a typed amount the way the amount input does.
///
/// The longest leading decimal number is taken (`"12.5abc"` is 12.5),
/// including an exponent such as `1e3`. Input without a number, or one
/// outside the representable range, coerces to zero instead of failing.
pub fn parse_amount(input: &str) -> Decimal {
    let input = input.trim_start();
    let bytes = input.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut seen_dot = false;
    let mut seen_digit = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    let mantissa_end = end;

    // exponent only counts when at least one digit follows the marker
    if seen_digit && matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    let mantissa = input[..mantissa_end].trim_end_matches('.');
    let (negative, unsigned) = match mantissa.as_bytes().first() {
        Some(b'-') => (true, &mantissa[1..]),
        Some(b'+') => (false, &mantissa[1..]),
        _ => (false, mantissa),
    };
    if unsigned.is_empty() || unsigned == "." {
        return Decimal::ZERO;
    }
    let unsigned = if unsigned.starts_with('.') {
        format!("0{unsigned}")
    } else {
        unsigned.to_string()
    };
    let parsed = if end > mantissa_end {
        Decimal::from_scientific(&format!("{unsigned}{}", &input[mantissa_end..end]))
    } else {
        unsigned.parse()
    };
    let value = parsed.unwrap_or(Decimal::ZERO);
    if negative { -value } else { value }
}

/// Keep only ASCII digits. Applied to the phone input on every keystroke.
pub fn strip_non_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// A form field that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Amount,
    Description,
    Name,
    Email,
    Phone,
}

/// Field-level validation messages. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<FormField, &'static str>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }
}

/// Check every field rule and collect the messages.
pub fn validate(form: &PaymentForm) -> ValidationErrors {
    let mut errors = BTreeMap::new();

    if form.amount <= Decimal::ZERO {
        errors.insert(
            FormField::Amount,
            "Please enter a valid amount greater than 0",
        );
    }

    if form.description.trim().is_empty() {
        errors.insert(FormField::Description, "Please enter a payment description");
    }

    if form.name.trim().is_empty() {
        errors.insert(FormField::Name, "Please enter your name");
    }

    if form.email.trim().is_empty() {
        errors.insert(FormField::Email, "Please enter your email address");
    } else if !is_valid_email(&form.email) {
        errors.insert(FormField::Email, "Please enter a valid email address");
    }

    if form.phone.trim().is_empty() {
        errors.insert(FormField::Phone, "Please enter your WhatsApp number");
    } else if !is_valid_phone(&form.phone) {
        errors.insert(FormField::Phone, "WhatsApp number must be 7-15 digits");
    }

    ValidationErrors(errors)
}

/// `local@domain.tld` shape: no whitespace, exactly one `@` with a
/// non-empty local part, and a dot inside the domain with text on both
/// sides.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn is_valid_phone(phone: &str) -> bool {
    (7..=15).contains(&phone.len()) && phone.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn valid_form() -> PaymentForm {
        PaymentForm {
            amount: Decimal::from(100),
            description: "Booking deposit".to_string(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "9171234567".to_string(),
            ..PaymentForm::new(&test_config())
        }
    }

    #[test]
    fn test_fresh_form_uses_configured_defaults() {
        let form = PaymentForm::new(&test_config());
        assert_eq!(form.currency, "EUR");
        assert_eq!(form.calling_code, "+63");
        assert_eq!(form.method, PaymentMethod::Card);
        assert_eq!(form.amount, Decimal::ZERO);
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(validate(&valid_form()).is_empty());
    }

    #[test]
    fn test_amount_rule() {
        let form = PaymentForm {
            amount: Decimal::ZERO,
            ..valid_form()
        };
        let errors = validate(&form);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(FormField::Amount),
            Some("Please enter a valid amount greater than 0")
        );

        let form = PaymentForm {
            amount: parse_amount("abc"),
            ..valid_form()
        };
        assert!(validate(&form).get(FormField::Amount).is_some());
    }

    #[test]
    fn test_blank_text_fields() {
        let form = PaymentForm {
            description: "   ".to_string(),
            name: "\t".to_string(),
            ..valid_form()
        };
        let errors = validate(&form);
        assert_eq!(errors.len(), 2);
        assert!(errors.get(FormField::Description).is_some());
        assert!(errors.get(FormField::Name).is_some());
    }

    #[test]
    fn test_email_rule() {
        let check = |email: &str| {
            validate(&PaymentForm {
                email: email.to_string(),
                ..valid_form()
            })
            .get(FormField::Email)
        };
        assert_eq!(check(""), Some("Please enter your email address"));
        assert_eq!(check("a@b"), Some("Please enter a valid email address"));
        assert_eq!(check("a@.com"), Some("Please enter a valid email address"));
        assert_eq!(check("a@b."), Some("Please enter a valid email address"));
        assert_eq!(check("a b@c.com"), Some("Please enter a valid email address"));
        assert_eq!(check("a@b@c.com"), Some("Please enter a valid email address"));
        assert_eq!(check("@b.com"), Some("Please enter a valid email address"));
        assert_eq!(check("a@b.com"), None);
        assert_eq!(check("first.last@mail.example.co"), None);
    }

    #[test]
    fn test_phone_rule() {
        let check = |phone: &str| {
            validate(&PaymentForm {
                phone: phone.to_string(),
                ..valid_form()
            })
            .get(FormField::Phone)
        };
        assert_eq!(check(""), Some("Please enter your WhatsApp number"));
        assert_eq!(check("123456"), Some("WhatsApp number must be 7-15 digits"));
        assert_eq!(check("1234567"), None);
        assert_eq!(check("123456789012345"), None);
        assert_eq!(check("1234567890123456"), Some("WhatsApp number must be 7-15 digits"));
    }

    #[test]
    fn test_parse_amount() {
        let dec = |s: &str| s.parse::<Decimal>().unwrap();
        assert_eq!(parse_amount("100"), dec("100"));
        assert_eq!(parse_amount(" 12.50 "), dec("12.50"));
        assert_eq!(parse_amount("12.5abc"), dec("12.5"));
        assert_eq!(parse_amount(".5"), dec("0.5"));
        assert_eq!(parse_amount("7."), dec("7"));
        assert_eq!(parse_amount("-3"), dec("-3"));
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("."), Decimal::ZERO);
        assert_eq!(parse_amount("-"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_exponent() {
        let dec = |s: &str| s.parse::<Decimal>().unwrap();
        assert_eq!(parse_amount("1e3"), dec("1000"));
        assert_eq!(parse_amount("2.5E-1"), dec("0.25"));
        assert_eq!(parse_amount("1e+2x"), dec("100"));
        assert_eq!(parse_amount("-1.5e2"), dec("-150"));
        // a bare marker is not an exponent
        assert_eq!(parse_amount("1e"), dec("1"));
        assert_eq!(parse_amount("1e-"), dec("1"));
        assert_eq!(parse_amount("e5"), Decimal::ZERO);
        assert_eq!(parse_amount("1e400"), Decimal::ZERO);
    }

    #[test]
    fn test_strip_non_digits_is_idempotent() {
        let once = strip_non_digits("(917) 123-4567 ext");
        assert_eq!(once, "9171234567");
        assert_eq!(strip_non_digits(&once), once);
        assert_eq!(strip_non_digits("٣٤٥"), "");
    }

    #[test]
    fn test_customer_whatsapp_concatenation() {
        let form = valid_form();
        assert_eq!(form.customer_whatsapp(), "+639171234567");
    }
}
