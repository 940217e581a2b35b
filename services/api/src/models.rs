//! API models for request and response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Primary key of a project row within its tenant schema
pub type ProjectId = i32;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Project entity, read from `<tenant>.projects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query string of `GET /projects`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
}

impl ProjectsQuery {
    /// Search term worth filtering on, if any
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// Page request after clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Pagination {
    /// `page < 1` becomes 1; a page size outside `1..=100` becomes 10
    pub fn clamp(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let page_size = page_size
            .filter(|s| (1..=MAX_PAGE_SIZE).contains(s))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self { page, page_size }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// One page of the projects visible to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPage {
    pub data: Vec<Project>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl ProjectPage {
    pub fn new(data: Vec<Project>, total_count: i64, pagination: Pagination) -> Self {
        let total_pages = if total_count <= 0 {
            0
        } else {
            (total_count + pagination.page_size - 1) / pagination.page_size
        };

        Self {
            data,
            total_count,
            page: pagination.page,
            page_size: pagination.page_size,
            total_pages,
            has_next_page: pagination.page < total_pages,
            has_previous_page: pagination.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(Pagination::clamp(None, None), Pagination { page: 1, page_size: 10 });
        assert_eq!(Pagination::clamp(Some(0), Some(0)).page, 1);
        assert_eq!(Pagination::clamp(Some(-1), Some(0)).page_size, 10);
        assert_eq!(Pagination::clamp(Some(3), Some(101)), Pagination { page: 3, page_size: 10 });
        assert_eq!(Pagination::clamp(Some(1), Some(100)).page_size, 100);
        assert_eq!(Pagination::clamp(Some(1), Some(1)).page_size, 1);
    }

    #[test]
    fn offset_never_overflows() {
        assert_eq!(Pagination::clamp(Some(3), Some(20)).offset(), 40);
        assert_eq!(Pagination::clamp(Some(i64::MAX), Some(100)).offset(), i64::MAX);
    }

    #[test]
    fn page_metadata() {
        let page = ProjectPage::new(vec![], 21, Pagination { page: 2, page_size: 10 });
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next_page);
        assert!(page.has_previous_page);

        let empty = ProjectPage::new(vec![], 0, Pagination { page: 1, page_size: 10 });
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next_page);
        assert!(!empty.has_previous_page);
    }

    #[test]
    fn blank_search_is_ignored() {
        let query = ProjectsQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.search_term(), None);

        let query = ProjectsQuery {
            search: Some(" Alpha ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.search_term(), Some("Alpha"));
    }

    #[test]
    fn serializes_page_in_camel_case() {
        let page = ProjectPage::new(vec![], 0, Pagination::clamp(None, None));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": [],
                "totalCount": 0,
                "page": 1,
                "pageSize": 10,
                "totalPages": 0,
                "hasNextPage": false,
                "hasPreviousPage": false
            })
        );
    }
}
