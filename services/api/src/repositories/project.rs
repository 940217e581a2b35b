//! Project repository for database operations

use async_trait::async_trait;
use common::{error::StoreResult, tenant::TenantId};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::debug;

use super::{ProjectFilter, ProjectSlice, ProjectStore};
use crate::models::Project;

/// PostgreSQL project repository
///
/// Visibility is decided in SQL: a project is selected only when an
/// access row links it to the requesting user.
#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    /// Create a new project repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append the access and search predicates shared by the count and page queries
fn push_visibility(
    builder: &mut QueryBuilder<'_, Postgres>,
    tenant: &TenantId,
    filter: &ProjectFilter,
) {
    builder
        .push(" FROM ")
        .push(tenant.table("projects"))
        .push(" p WHERE EXISTS (SELECT 1 FROM ")
        .push(tenant.table("project_access"))
        .push(" pa WHERE pa.project_id = p.id AND pa.user_id = ")
        .push_bind(filter.user_id)
        .push(")");

    if let Some(term) = &filter.search {
        builder
            .push(" AND p.name ILIKE ")
            .push_bind(like_pattern(term))
            .push(r" ESCAPE '\'");
    }
}

/// Order by name then id and cut out one page
///
/// Names compare byte-wise (`COLLATE "C"`), the same order the in-memory
/// store uses, whatever the database's default collation is.
fn push_page_order(builder: &mut QueryBuilder<'_, Postgres>, limit: i64, offset: i64) {
    builder
        .push(r#" ORDER BY p.name COLLATE "C" ASC, p.id ASC LIMIT "#)
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
}

/// `%term%` with LIKE wildcards in `term` escaped
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl ProjectStore for ProjectRepository {
    async fn list_for_user(
        &self,
        tenant: &TenantId,
        filter: &ProjectFilter,
    ) -> StoreResult<ProjectSlice> {
        debug!(tenant = %tenant, user_id = filter.user_id, "Listing projects");

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        push_visibility(&mut count, tenant, filter);
        let total_count = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        if total_count == 0 || filter.offset >= total_count {
            return Ok(ProjectSlice {
                items: Vec::new(),
                total_count,
            });
        }

        let mut page = QueryBuilder::<Postgres>::new(
            "SELECT p.id, p.name, p.description, p.status, p.created_at, p.updated_at",
        );
        push_visibility(&mut page, tenant, filter);
        push_page_order(&mut page, filter.limit, filter.offset);

        let rows = page.build().fetch_all(&self.pool).await?;

        let items = rows
            .into_iter()
            .map(|row| {
                Ok(Project {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    description: row.try_get("description")?,
                    status: row.try_get("status")?,
                    created_at: row.try_get("created_at")?,
                    updated_at: row.try_get("updated_at")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(ProjectSlice { items, total_count })
    }

    async fn health_check(&self) -> bool {
        common::database::health_check(&self.pool).await
    }
}
