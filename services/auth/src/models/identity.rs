//! Caller identity established by a successful login

use common::tenant::TenantId;
use serde::{Deserialize, Serialize};

use super::user::{User, UserId};

/// Who the caller is, as seen by every request after login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    #[serde(rename = "tenantSlug")]
    pub tenant_id: TenantId,
    pub role: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            tenant_id: user.tenant_id.clone(),
            role: user.role.clone(),
        }
    }
}
