pub mod auth;
pub mod geo;
pub mod order;
pub mod payment_intent;

pub use auth::{AuthErrorBody, AuthUser, PasswordCredentials, SessionData};
pub use geo::GeoLookup;
pub use order::{NewOrder, OrderRow, OrderStatus, PaymentMethod};
pub use payment_intent::{CreatePaymentIntent, PaymentIntentReply};
