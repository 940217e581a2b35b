//! Project listing for the authenticated user

use auth::models::UserId;
use common::{error::StoreResult, tenant::TenantId, timeout::bounded};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::{
    models::{Pagination, ProjectPage, ProjectsQuery},
    repositories::{ProjectFilter, ProjectStore},
};

/// Pages through the projects a user has been granted access to
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn ProjectStore>,
    store_timeout: Duration,
}

impl ProjectService {
    pub fn new(store: Arc<dyn ProjectStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    /// List one page of `user_id`'s projects in `tenant`
    ///
    /// Out-of-range paging values are clamped; no match is an empty page.
    pub async fn list(
        &self,
        tenant: &TenantId,
        user_id: UserId,
        query: &ProjectsQuery,
    ) -> StoreResult<ProjectPage> {
        let pagination = Pagination::clamp(query.page, query.page_size);
        let filter = ProjectFilter {
            user_id,
            search: query.search_term().map(str::to_string),
            offset: pagination.offset(),
            limit: pagination.page_size,
        };

        let slice = bounded(self.store_timeout, self.store.list_for_user(tenant, &filter)).await?;
        debug!(
            tenant = %tenant,
            user_id,
            total = slice.total_count,
            returned = slice.items.len(),
            "Projects listed"
        );

        Ok(ProjectPage::new(slice.items, slice.total_count, pagination))
    }

    pub async fn health_check(&self) -> bool {
        matches!(
            tokio::time::timeout(self.store_timeout, self.store.health_check()).await,
            Ok(true)
        )
    }
}
