//! Tenant-scoped user storage

pub mod memory;
pub mod user;

use async_trait::async_trait;
use common::{error::StoreResult, tenant::TenantId};

use crate::models::User;

pub use memory::InMemoryUserStore;
pub use user::UserRepository;

/// Read access to the users of one tenant at a time
///
/// The tenant is an explicit argument on every call; implementations must
/// not consult any other namespace.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact, case-sensitive username lookup within `tenant`
    async fn find_by_username(&self, tenant: &TenantId, username: &str)
    -> StoreResult<Option<User>>;

    /// Check if the backing store is reachable
    async fn health_check(&self) -> bool;
}
