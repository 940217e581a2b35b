//! Login orchestration
//!
//! A login attempt walks tenant resolution, credential verification and
//! session issuance in order. Every rejection looks the same from outside;
//! the log records which step said no.

use std::sync::Arc;

use anyhow::Context;
use common::cache::KeyValueStore;
use tracing::{info, warn};

use crate::{
    credentials::{CredentialVerifier, Verification},
    error::AuthError,
    jwt::{JwtConfig, JwtService},
    models::{Identity, Session},
    password::PasswordPolicy,
    repositories::UserStore,
    session::{SessionConfig, SessionReference, SessionStore},
    tenant::TenantResolver,
};

/// The one message shown for every rejected login
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// A rejected login, identical for every cause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginRejection;

impl LoginRejection {
    pub fn message(&self) -> &'static str {
        INVALID_CREDENTIALS
    }
}

#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated {
        reference: SessionReference,
        identity: Identity,
    },
    Rejected(LoginRejection),
}

/// Internal rejection cause, for logs only
#[derive(Debug, Clone, Copy)]
enum RejectReason {
    BlankField,
    UnknownTenant,
    UnknownUserOrBadPassword,
}

impl RejectReason {
    fn as_str(&self) -> &'static str {
        match self {
            RejectReason::BlankField => "blank_field",
            RejectReason::UnknownTenant => "unknown_tenant",
            RejectReason::UnknownUserOrBadPassword => "unknown_user_or_bad_password",
        }
    }
}

/// Authentication service tying tenants, credentials and sessions together
#[derive(Clone)]
pub struct AuthService {
    tenants: TenantResolver,
    credentials: CredentialVerifier,
    sessions: SessionStore,
    session_ttl_seconds: u64,
}

impl AuthService {
    pub fn new(
        tenants: TenantResolver,
        credentials: CredentialVerifier,
        sessions: SessionStore,
        session_ttl_seconds: u64,
    ) -> Self {
        Self {
            tenants,
            credentials,
            sessions,
            session_ttl_seconds,
        }
    }

    /// Assemble the service over the given stores, reading the rest of its
    /// configuration from the environment
    pub fn from_env(
        users: Arc<dyn UserStore>,
        store: Arc<dyn KeyValueStore>,
    ) -> anyhow::Result<Self> {
        let tenants = TenantResolver::from_env()?;
        let policy = PasswordPolicy::from_env()?;
        let session_config = SessionConfig::from_env()?;
        let jwt = JwtService::new(JwtConfig::from_env()?)
            .context("Failed to initialize session token signing")?;

        info!(tenants = tenants.len(), ?policy, "Authentication service configured");

        Ok(Self::new(
            tenants,
            CredentialVerifier::new(users, policy, session_config.store_timeout),
            SessionStore::new(store, jwt, session_config.store_timeout),
            session_config.ttl_seconds,
        ))
    }

    pub fn session_ttl_seconds(&self) -> u64 {
        self.session_ttl_seconds
    }

    /// Attempt a login
    ///
    /// Rejections are `Ok(LoginOutcome::Rejected)`; only store and signing
    /// failures are errors.
    pub async fn login(
        &self,
        company_key: &str,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, AuthError> {
        if company_key.trim().is_empty()
            || username.trim().is_empty()
            || password.trim().is_empty()
        {
            return Ok(reject(RejectReason::BlankField));
        }

        let tenant = match self.tenants.resolve(company_key) {
            Ok(tenant) => tenant,
            Err(_) => return Ok(reject(RejectReason::UnknownTenant)),
        };

        let identity = match self.credentials.verify(&tenant, username, password).await? {
            Verification::Verified(identity) => identity,
            Verification::InvalidCredentials => {
                return Ok(reject(RejectReason::UnknownUserOrBadPassword));
            }
        };

        let session = Session::new(&identity, self.session_ttl_seconds);
        let reference = self
            .sessions
            .create(&session, self.session_ttl_seconds)
            .await?;

        info!(
            tenant = %identity.tenant_id,
            user_id = identity.user_id,
            session_id = %session.id,
            "Login succeeded"
        );

        Ok(LoginOutcome::Authenticated {
            reference,
            identity,
        })
    }

    /// Resolve a session reference to the caller's identity
    pub async fn authenticate(&self, reference: &str) -> Result<Option<Identity>, AuthError> {
        let session = self.sessions.resolve(reference).await?;
        Ok(session.map(|s| s.identity()))
    }

    /// End the session behind `reference`
    pub async fn logout(&self, reference: &str) -> Result<(), AuthError> {
        self.sessions.revoke(reference).await
    }

    /// Both the user store and the session store are reachable
    pub async fn health_check(&self) -> bool {
        let (users, sessions) =
            tokio::join!(self.credentials.health_check(), self.sessions.health_check());
        users && sessions
    }
}

fn reject(reason: RejectReason) -> LoginOutcome {
    warn!(reason = reason.as_str(), "Login rejected");
    LoginOutcome::Rejected(LoginRejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::password::hash_password;
    use crate::repositories::InMemoryUserStore;
    use async_trait::async_trait;
    use common::{cache::MemoryStore, error::StoreResult, tenant::TenantId};
    use std::time::Duration;

    /// Never answers, so any lookup turns into a store timeout
    struct StalledUserStore;

    #[async_trait]
    impl UserStore for StalledUserStore {
        async fn find_by_username(&self, _: &TenantId, _: &str) -> StoreResult<Option<User>> {
            std::future::pending().await
        }

        async fn health_check(&self) -> bool {
            std::future::pending().await
        }
    }

    fn service_over(users: Arc<dyn UserStore>) -> (AuthService, MemoryStore) {
        let kv = MemoryStore::new();
        let timeout = Duration::from_secs(1);
        let jwt = JwtService::new(JwtConfig::with_secret("test-secret")).unwrap();
        let service = AuthService::new(
            TenantResolver::default(),
            CredentialVerifier::new(users, PasswordPolicy::Argon2, timeout),
            SessionStore::new(Arc::new(kv.clone()), jwt, timeout),
            3600,
        );
        (service, kv)
    }

    fn service() -> (AuthService, MemoryStore) {
        let mut users = InMemoryUserStore::new();
        users.insert(
            &TenantId::new("tenant_t1").unwrap(),
            1,
            "pm_t1",
            &hash_password("password123").unwrap(),
            "PM",
        );
        service_over(Arc::new(users))
    }

    #[tokio::test(start_paused = true)]
    async fn blank_fields_are_rejected_before_any_lookup() {
        let (service, kv) = service_over(Arc::new(StalledUserStore));
        for (key, user, pass) in [
            ("", "pm_t1", "password123"),
            ("t1", "  ", "password123"),
            ("t1", "pm_t1", ""),
            ("t1", "pm_t1", "   "),
        ] {
            let outcome = service.login(key, user, pass).await.unwrap();
            assert!(matches!(outcome, LoginOutcome::Rejected(_)));
        }
        assert!(kv.is_empty().await);
    }

    #[tokio::test]
    async fn usernames_match_exactly() {
        let (service, kv) = service();
        for user in ["  pm_t1  ", "pm_t1 ", "PM_T1"] {
            let outcome = service.login("t1", user, "password123").await.unwrap();
            assert!(matches!(outcome, LoginOutcome::Rejected(_)));
        }
        assert!(kv.is_empty().await);
    }

    #[tokio::test]
    async fn passwords_are_not_trimmed() {
        let (service, _) = service();
        let outcome = service.login("t1", "pm_t1", " password123 ").await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Rejected(_)));
    }

    #[tokio::test]
    async fn successful_login_issues_a_resolvable_reference() {
        let (service, kv) = service();
        let outcome = service.login("T1", "pm_t1", "password123").await.unwrap();

        let LoginOutcome::Authenticated {
            reference,
            identity,
        } = outcome
        else {
            panic!("expected authenticated outcome");
        };
        assert_eq!(identity.tenant_id.as_str(), "tenant_t1");
        assert_eq!(kv.len().await, 1);

        let resolved = service.authenticate(reference.as_str()).await.unwrap();
        assert_eq!(resolved, Some(identity));
    }

    #[test]
    fn rejection_message_is_generic() {
        assert_eq!(LoginRejection.message(), "Invalid credentials");
    }
}
