//! In-memory user store for tests and local development

use async_trait::async_trait;
use chrono::Utc;
use common::{error::StoreResult, tenant::TenantId};
use std::collections::HashMap;

use super::UserStore;
use crate::models::{User, UserId};

/// Users keyed by tenant, then by username
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    tenants: HashMap<TenantId, HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user to `tenant` with an already-computed password hash
    pub fn insert(
        &mut self,
        tenant: &TenantId,
        id: UserId,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> &mut Self {
        let now = Utc::now();
        let user = User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role: role.to_string(),
            tenant_id: tenant.clone(),
            created_at: now,
            updated_at: now,
        };

        self.tenants
            .entry(tenant.clone())
            .or_default()
            .insert(user.username.clone(), user);
        self
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(
        &self,
        tenant: &TenantId,
        username: &str,
    ) -> StoreResult<Option<User>> {
        Ok(self
            .tenants
            .get(tenant)
            .and_then(|users| users.get(username))
            .cloned())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookups_stay_inside_the_tenant() {
        let t1 = TenantId::new("tenant_t1").unwrap();
        let t2 = TenantId::new("tenant_t2").unwrap();

        let mut store = InMemoryUserStore::new();
        store.insert(&t1, 1, "pm_t1", "hash", "PM");

        assert!(store.find_by_username(&t1, "pm_t1").await.unwrap().is_some());
        assert!(store.find_by_username(&t2, "pm_t1").await.unwrap().is_none());
        assert!(store.find_by_username(&t1, "PM_T1").await.unwrap().is_none());
    }
}
