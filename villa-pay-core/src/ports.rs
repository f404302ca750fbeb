//! Collaborator interfaces.
//!
//! The payment page owns no storage, identity or gateway of its own. Each
//! external collaborator is reached through one of these traits so the
//! orchestration can run against the real HTTP clients (see
//! [`adapters`](crate::adapters)) or against in-memory fakes.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use villa_pay_sdk::objects::{
    AuthUser, CreatePaymentIntent, NewOrder, OrderRow, PaymentIntentReply, SessionData,
};

use crate::error::{
    AuthError, ClipboardError, GatewayError, GeolocationError, PersistenceError,
};

/// External identity service.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionData, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// The user of the current session, `Ok(None)` without one.
    async fn get_user(&self) -> Result<Option<AuthUser>, AuthError>;
}

/// The `orders` table.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert one order and return the stored row with its identifier.
    async fn insert_order(&self, order: NewOrder) -> Result<OrderRow, PersistenceError>;
}

/// The hosted `create-payment-intent` function.
#[async_trait]
pub trait PaymentIntents: Send + Sync {
    /// Invoke the function. A reply may still carry an in-band error or
    /// lack a URL; transport and HTTP failures are returned as `Err`.
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntent,
    ) -> Result<PaymentIntentReply, GatewayError>;
}

/// IP geolocation lookup.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// International calling code of `ip`'s location, e.g. `+63`.
    ///
    /// `None` locates the address the lookup request itself comes from.
    async fn calling_code(&self, ip: Option<IpAddr>) -> Result<String, GeolocationError>;
}

/// Platform clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Browser-session scoped key/value storage.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

/// [`SessionStorage`] kept in process memory for the lifetime of the value.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value);
    }
}

/// A view of a shared [`SessionStorage`] that keeps its keys apart from
/// every other scope.
#[derive(Clone)]
pub struct ScopedSessionStorage {
    inner: Arc<dyn SessionStorage>,
    scope: String,
}

impl ScopedSessionStorage {
    pub fn new(inner: Arc<dyn SessionStorage>, scope: impl Into<String>) -> Self {
        Self {
            inner,
            scope: scope.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}/{}", self.scope, key)
    }
}

impl SessionStorage for ScopedSessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(&self.key(key))
    }

    fn set(&self, key: &str, value: String) {
        self.inner.set(&self.key(key), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_session_storage() {
        let storage = MemorySessionStorage::new();
        assert_eq!(storage.get("detectedCountryCode"), None);
        storage.set("detectedCountryCode", "+7".to_string());
        assert_eq!(storage.get("detectedCountryCode").as_deref(), Some("+7"));
        storage.set("detectedCountryCode", "+44".to_string());
        assert_eq!(storage.get("detectedCountryCode").as_deref(), Some("+44"));
    }

    #[test]
    fn test_scopes_do_not_share_keys() {
        let shared: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::new());
        let first = ScopedSessionStorage::new(shared.clone(), "203.0.113.9");
        let second = ScopedSessionStorage::new(shared.clone(), "198.51.100.4");

        first.set("detectedCountryCode", "+63".to_string());
        assert_eq!(first.get("detectedCountryCode").as_deref(), Some("+63"));
        assert_eq!(second.get("detectedCountryCode"), None);
        assert_eq!(shared.get("detectedCountryCode"), None);

        let again = ScopedSessionStorage::new(shared, "203.0.113.9");
        assert_eq!(again.get("detectedCountryCode").as_deref(), Some("+63"));
    }
}
