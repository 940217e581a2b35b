//! Tenant-scoped project storage

pub mod memory;
pub mod project;

use async_trait::async_trait;
use auth::models::UserId;
use common::{error::StoreResult, tenant::TenantId};

use crate::models::Project;

pub use memory::InMemoryProjectStore;
pub use project::ProjectRepository;

/// Which slice of a user's projects to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFilter {
    pub user_id: UserId,
    /// Case-insensitive substring of the project name, matched literally
    pub search: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

/// Projects on the requested page plus the size of the whole filtered set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSlice {
    pub items: Vec<Project>,
    pub total_count: i64,
}

/// Read access to the projects of one tenant at a time
///
/// Only projects with a `project_access` row for the user are ever returned,
/// ordered by name and then id.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list_for_user(
        &self,
        tenant: &TenantId,
        filter: &ProjectFilter,
    ) -> StoreResult<ProjectSlice>;

    /// Check if the backing store is reachable
    async fn health_check(&self) -> bool;
}
