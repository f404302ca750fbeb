//! Order rows as stored in the `orders` table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment method tag persisted with every order.
///
/// The card path goes through the hosted gateway and is tagged `stripe`
/// on the wire; every other method is a manual transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[serde(rename = "stripe")]
    Card,
    Paypal,
    Gcash,
    Rubles,
    Revolut,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Card,
        PaymentMethod::Paypal,
        PaymentMethod::Gcash,
        PaymentMethod::Rubles,
        PaymentMethod::Revolut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "stripe",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Gcash => "gcash",
            PaymentMethod::Rubles => "rubles",
            PaymentMethod::Revolut => "revolut",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order status.
///
/// The payment page only ever writes `pending` and `pending_manual_review`;
/// the remaining states are set later by the order-management side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    PendingManualReview,
    Paid,
    Rejected,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::PendingManualReview => write!(f, "pending_manual_review"),
            OrderStatus::Paid => write!(f, "paid"),
            OrderStatus::Rejected => write!(f, "rejected"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Insert payload for a new order.
///
/// Field names match the `orders` columns exactly. The total column is
/// called `total_amount_php` in the table although it holds the amount
/// normalized to the base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: Option<Uuid>,
    #[serde(rename = "total_amount_php", with = "rust_decimal::serde::float")]
    pub total_amount_base: Decimal,
    pub currency: String,
    pub description: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_whatsapp: String,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
}

/// A row returned by the table after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: Uuid,
    #[serde(flatten)]
    pub order: NewOrder,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<time::OffsetDateTime>,
}
