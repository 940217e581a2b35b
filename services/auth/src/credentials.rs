//! Credential verification against a tenant's user table

use common::{tenant::TenantId, timeout::bounded};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::{
    error::AuthError, models::Identity, password::PasswordPolicy, repositories::UserStore,
};

/// Result of checking a username/password pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Verified(Identity),
    /// Unknown user or wrong password; the two are deliberately merged
    InvalidCredentials,
}

/// Checks credentials within exactly one tenant
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
    policy: PasswordPolicy,
    store_timeout: Duration,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserStore>, policy: PasswordPolicy, store_timeout: Duration) -> Self {
        Self {
            users,
            policy,
            store_timeout,
        }
    }

    /// Verify `password` for `username` inside `tenant`
    ///
    /// Only store failures are errors. Hashing runs on the blocking pool so
    /// Argon2 never stalls the async workers.
    pub async fn verify(
        &self,
        tenant: &TenantId,
        username: &str,
        password: &str,
    ) -> Result<Verification, AuthError> {
        let user = bounded(
            self.store_timeout,
            self.users.find_by_username(tenant, username),
        )
        .await?;

        let policy = self.policy;
        let password = password.to_string();

        let Some(user) = user else {
            debug!(tenant = %tenant, "No such user, running dummy verification");
            tokio::task::spawn_blocking(move || policy.verify_dummy(&password))
                .await
                .map_err(|e| AuthError::Internal(format!("password task failed: {e}")))?;
            return Ok(Verification::InvalidCredentials);
        };

        let stored_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || policy.verify(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("password task failed: {e}")))?;

        if matches {
            Ok(Verification::Verified(Identity::from(&user)))
        } else {
            Ok(Verification::InvalidCredentials)
        }
    }

    pub async fn health_check(&self) -> bool {
        matches!(
            tokio::time::timeout(self.store_timeout, self.users.health_check()).await,
            Ok(true)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::{hash_password, legacy_md5_hex};
    use crate::repositories::InMemoryUserStore;

    fn tenant(id: &str) -> TenantId {
        TenantId::new(id).unwrap()
    }

    fn verifier(policy: PasswordPolicy) -> CredentialVerifier {
        let mut users = InMemoryUserStore::new();
        users
            .insert(
                &tenant("tenant_t1"),
                1,
                "pm_t1",
                &hash_password("password123").unwrap(),
                "PM",
            )
            .insert(
                &tenant("tenant_t1"),
                2,
                "legacy_t1",
                &legacy_md5_hex("password123"),
                "Developer",
            );
        CredentialVerifier::new(Arc::new(users), policy, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn correct_password_yields_identity() {
        let verifier = verifier(PasswordPolicy::Argon2);
        let result = verifier
            .verify(&tenant("tenant_t1"), "pm_t1", "password123")
            .await
            .unwrap();

        let Verification::Verified(identity) = result else {
            panic!("expected verified identity, got {result:?}");
        };
        assert_eq!(identity.user_id, 1);
        assert_eq!(identity.role, "PM");
        assert_eq!(identity.tenant_id.as_str(), "tenant_t1");
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_look_the_same() {
        let verifier = verifier(PasswordPolicy::Argon2);
        let t1 = tenant("tenant_t1");

        let wrong_password = verifier.verify(&t1, "pm_t1", "nope").await.unwrap();
        let unknown_user = verifier.verify(&t1, "ghost", "password123").await.unwrap();
        let wrong_case = verifier.verify(&t1, "PM_T1", "password123").await.unwrap();
        let other_tenant = verifier
            .verify(&tenant("tenant_t2"), "pm_t1", "password123")
            .await
            .unwrap();

        for outcome in [wrong_password, unknown_user, wrong_case, other_tenant] {
            assert_eq!(outcome, Verification::InvalidCredentials);
        }
    }

    #[tokio::test]
    async fn legacy_hashes_follow_the_policy() {
        let t1 = tenant("tenant_t1");

        let strict = verifier(PasswordPolicy::Argon2);
        assert_eq!(
            strict.verify(&t1, "legacy_t1", "password123").await.unwrap(),
            Verification::InvalidCredentials
        );

        let compat = verifier(PasswordPolicy::Argon2WithLegacyMd5);
        assert!(matches!(
            compat.verify(&t1, "legacy_t1", "password123").await.unwrap(),
            Verification::Verified(_)
        ));
    }
}
