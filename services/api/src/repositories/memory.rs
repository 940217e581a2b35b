//! In-memory project store for tests and local development

use async_trait::async_trait;
use auth::models::UserId;
use chrono::Utc;
use common::{error::StoreResult, tenant::TenantId};
use std::collections::{HashMap, HashSet};

use super::{ProjectFilter, ProjectSlice, ProjectStore};
use crate::models::{Project, ProjectId};

#[derive(Debug, Clone, Default)]
struct TenantProjects {
    projects: Vec<Project>,
    access: HashSet<(ProjectId, UserId)>,
}

/// Projects and access grants keyed by tenant
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectStore {
    tenants: HashMap<TenantId, TenantProjects>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active project named `name` to `tenant`
    pub fn insert(&mut self, tenant: &TenantId, id: ProjectId, name: &str) -> &mut Self {
        let now = Utc::now();
        self.tenants
            .entry(tenant.clone())
            .or_default()
            .projects
            .push(Project {
                id,
                name: name.to_string(),
                description: None,
                status: "Active".to_string(),
                created_at: now,
                updated_at: now,
            });
        self
    }

    /// Give `user_id` access to project `project_id` in `tenant`
    pub fn grant(&mut self, tenant: &TenantId, project_id: ProjectId, user_id: UserId) -> &mut Self {
        self.tenants
            .entry(tenant.clone())
            .or_default()
            .access
            .insert((project_id, user_id));
        self
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn list_for_user(
        &self,
        tenant: &TenantId,
        filter: &ProjectFilter,
    ) -> StoreResult<ProjectSlice> {
        let Some(data) = self.tenants.get(tenant) else {
            return Ok(ProjectSlice::default());
        };

        let term = filter.search.as_deref().map(str::to_lowercase);
        let mut visible: Vec<&Project> = data
            .projects
            .iter()
            .filter(|p| data.access.contains(&(p.id, filter.user_id)))
            .filter(|p| {
                term.as_deref()
                    .is_none_or(|t| p.name.to_lowercase().contains(t))
            })
            .collect();
        // Byte-wise, matching `COLLATE "C"` in the SQL repository
        visible.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let items = visible
            .iter()
            .skip(usize::try_from(filter.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(filter.limit).unwrap_or(0))
            .map(|p| (*p).clone())
            .collect();

        Ok(ProjectSlice {
            items,
            total_count: visible.len() as i64,
        })
    }

    async fn health_check(&self) -> bool {
        true
    }
}
