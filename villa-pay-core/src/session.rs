//! Session Accessor: sign-in, sign-out and current-user lookup.

use std::sync::Arc;

use tracing::{debug, info, warn};
use villa_pay_sdk::objects::{AuthUser, SessionData};

use crate::error::AuthError;
use crate::ports::IdentityService;

/// Thin wrapper over the identity service. Each call is one independent
/// round trip.
#[derive(Clone)]
pub struct SessionAccessor {
    identity: Arc<dyn IdentityService>,
}

impl SessionAccessor {
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        Self { identity }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionData, AuthError> {
        match self.identity.sign_in_with_password(email, password).await {
            Ok(session) => {
                info!(user_id = %session.user.id, "Signed in");
                Ok(session)
            }
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                Err(e)
            }
        }
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.identity.sign_out().await.inspect_err(|e| {
            warn!(error = %e, "Sign-out failed");
        })
    }

    /// The signed-in user, or `None`. Lookup failures count as "no user".
    pub async fn current_user(&self) -> Option<AuthUser> {
        match self.identity.get_user().await {
            Ok(user) => user,
            Err(e) => {
                debug!(error = %e, "Current user unavailable, continuing anonymously");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Identity fake holding at most one signed-in user.
    #[derive(Default)]
    pub(crate) struct FakeIdentity {
        pub user: Mutex<Option<AuthUser>>,
        pub fail_lookup: bool,
        pub fail_sign_out: bool,
    }

    pub(crate) fn user(id: Uuid) -> AuthUser {
        AuthUser {
            id,
            email: Some("guest@example.com".to_string()),
            role: Some("authenticated".to_string()),
            created_at: None,
        }
    }

    #[async_trait]
    impl IdentityService for FakeIdentity {
        async fn sign_in_with_password(
            &self,
            email: &str,
            password: &str,
        ) -> Result<SessionData, AuthError> {
            if password != "correct horse" {
                return Err(AuthError::Rejected("Invalid login credentials".to_string()));
            }
            let signed_in = AuthUser {
                email: Some(email.to_string()),
                ..user(Uuid::from_u128(7))
            };
            *self.user.lock().unwrap() = Some(signed_in.clone());
            Ok(SessionData {
                access_token: "jwt".to_string(),
                token_type: "bearer".to_string(),
                expires_in: 3600,
                expires_at: None,
                refresh_token: "refresh".to_string(),
                user: signed_in,
            })
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            if self.fail_sign_out {
                return Err(AuthError::Unavailable("connection reset".to_string()));
            }
            *self.user.lock().unwrap() = None;
            Ok(())
        }

        async fn get_user(&self) -> Result<Option<AuthUser>, AuthError> {
            if self.fail_lookup {
                return Err(AuthError::Unavailable("timeout".to_string()));
            }
            Ok(self.user.lock().unwrap().clone())
        }
    }

    #[tokio::test]
    async fn test_sign_in_then_current_user() {
        let accessor = SessionAccessor::new(Arc::new(FakeIdentity::default()));
        assert!(accessor.current_user().await.is_none());

        let session = accessor
            .sign_in("guest@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(session.user.id, Uuid::from_u128(7));
        assert_eq!(
            accessor.current_user().await.map(|u| u.id),
            Some(Uuid::from_u128(7))
        );

        accessor.sign_out().await.unwrap();
        assert!(accessor.current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let accessor = SessionAccessor::new(Arc::new(FakeIdentity::default()));
        let err = accessor
            .sign_in("guest@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AuthError::Rejected("Invalid login credentials".to_string())
        );
    }

    #[tokio::test]
    async fn test_sign_out_failure_is_reported() {
        let accessor = SessionAccessor::new(Arc::new(FakeIdentity {
            fail_sign_out: true,
            ..Default::default()
        }));
        assert!(matches!(
            accessor.sign_out().await,
            Err(AuthError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_failure_means_no_user() {
        let accessor = SessionAccessor::new(Arc::new(FakeIdentity {
            user: Mutex::new(Some(user(Uuid::from_u128(1)))),
            fail_lookup: true,
            ..Default::default()
        }));
        assert!(accessor.current_user().await.is_none());
    }
}
