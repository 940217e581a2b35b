//! User repository for database operations

use async_trait::async_trait;
use common::{error::StoreResult, tenant::TenantId};
use sqlx::{PgPool, Row};
use tracing::debug;

use super::UserStore;
use crate::models::User;

/// PostgreSQL user repository
///
/// Each tenant owns a schema containing a `users` table; queries name the
/// schema explicitly.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_username(
        &self,
        tenant: &TenantId,
        username: &str,
    ) -> StoreResult<Option<User>> {
        debug!(tenant = %tenant, "Finding user by username");

        let sql = format!(
            r#"
            SELECT id, username, password, role, created_at, updated_at
            FROM {}
            WHERE username = $1
            "#,
            tenant.table("users")
        );

        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let user = User {
                    id: row.try_get("id")?,
                    username: row.try_get("username")?,
                    password_hash: row.try_get("password")?,
                    role: row.try_get("role")?,
                    tenant_id: tenant.clone(),
                    created_at: row.try_get("created_at")?,
                    updated_at: row.try_get("updated_at")?,
                };
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    async fn health_check(&self) -> bool {
        common::database::health_check(&self.pool).await
    }
}
