//! User model

use chrono::{DateTime, Utc};
use common::tenant::TenantId;

/// Primary key of a user row within its tenant schema
pub type UserId = i32;

/// User entity, read from `<tenant>.users`
///
/// Users are provisioned outside this service; nothing here writes them.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub tenant_id: TenantId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
