//! Row-level visibility and pagination properties of the project listing,
//! checked against the in-memory project store.

use api::{
    models::{Project, ProjectsQuery},
    projects::ProjectService,
    repositories::InMemoryProjectStore,
};
use common::tenant::TenantId;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Fixture {
    names: Vec<String>,
    grants: HashSet<(i32, i32)>,
}

fn fixture() -> impl Strategy<Value = Fixture> {
    (
        prop::collection::vec("[A-Ca-c]{1,3}", 0..30),
        prop::collection::hash_set((1..=30i32, 1..=3i32), 0..60),
    )
        .prop_map(|(names, grants)| Fixture { names, grants })
}

fn tenant() -> TenantId {
    TenantId::new("tenant_t1").unwrap()
}

fn service_for(fixture: &Fixture) -> ProjectService {
    let tenant = tenant();
    let mut store = InMemoryProjectStore::new();
    for (index, name) in fixture.names.iter().enumerate() {
        store.insert(&tenant, index as i32 + 1, name);
    }
    for (project_id, user_id) in &fixture.grants {
        store.grant(&tenant, *project_id, *user_id);
    }
    // A second tenant granting everything to everyone must never leak
    let other = TenantId::new("tenant_t2").unwrap();
    for id in 1..=30 {
        store.insert(&other, id, "leak").grant(&other, id, 1).grant(&other, id, 2);
    }

    ProjectService::new(Arc::new(store), Duration::from_secs(1))
}

fn query(page: i64, page_size: i64, search: Option<&str>) -> ProjectsQuery {
    ProjectsQuery {
        page: Some(page),
        page_size: Some(page_size),
        search: search.map(str::to_string),
    }
}

/// The ordered set a user should see, computed directly from the fixture
fn expected(fixture: &Fixture, user_id: i32, search: Option<&str>) -> Vec<(String, i32)> {
    let term = search.map(str::to_lowercase);
    let mut rows: Vec<(String, i32)> = fixture
        .names
        .iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), index as i32 + 1))
        .filter(|(_, id)| fixture.grants.contains(&(*id, user_id)))
        .filter(|(name, _)| {
            term.as_deref()
                .is_none_or(|t| name.to_lowercase().contains(t))
        })
        .collect();
    rows.sort();
    rows
}

fn keys(projects: &[Project]) -> Vec<(String, i32)> {
    projects.iter().map(|p| (p.name.clone(), p.id)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    /// Property: every listed project has an access row for the caller.
    #[test]
    fn listing_never_exceeds_granted_projects(
        fixture in fixture(),
        user_id in 1..=3i32,
        page in -2..6i64,
        page_size in 0..12i64,
        search in prop::option::of("[a-cA-C]{0,2}"),
    ) {
        let service = service_for(&fixture);
        let page = tokio_test::block_on(
            service.list(&tenant(), user_id, &query(page, page_size, search.as_deref()))
        ).unwrap();

        for project in &page.data {
            prop_assert!(fixture.grants.contains(&(project.id, user_id)));
            prop_assert_ne!(project.name.as_str(), "leak");
        }
        prop_assert!((page.data.len() as i64) <= page.page_size);
    }

    /// Property: walking every page reproduces the full ordered filtered set,
    /// and the total does not depend on which page was asked for.
    #[test]
    fn pages_concatenate_to_the_filtered_set(
        fixture in fixture(),
        user_id in 1..=3i32,
        page_size in 1..8i64,
        search in prop::option::of("[a-c]{1,2}"),
    ) {
        let service = service_for(&fixture);
        let want = expected(&fixture, user_id, search.as_deref());

        let mut seen = Vec::new();
        let mut page_number = 1;
        loop {
            let page = tokio_test::block_on(service.list(
                &tenant(),
                user_id,
                &query(page_number, page_size, search.as_deref()),
            ))
            .unwrap();

            prop_assert_eq!(page.total_count, want.len() as i64);
            prop_assert_eq!(page.has_previous_page, page_number > 1);
            seen.extend(keys(&page.data));

            if !page.has_next_page {
                break;
            }
            page_number += 1;
        }

        prop_assert_eq!(seen, want);
    }
}

#[tokio::test]
async fn out_of_range_paging_is_clamped() {
    let fixture = Fixture {
        names: (0..25).map(|i| format!("Project {i:02}")).collect(),
        grants: (1..=25).map(|id| (id, 1)).collect(),
    };
    let service = service_for(&fixture);

    for (page, page_size) in [(0, 0), (-1, 101), (1, 10)] {
        let result = service
            .list(&tenant(), 1, &query(page, page_size, None))
            .await
            .unwrap();
        assert_eq!(result.page, 1);
        assert_eq!(result.page_size, 10);
        assert_eq!(result.data.len(), 10);
        assert_eq!(result.total_count, 25);
        assert_eq!(result.total_pages, 3);
    }

    let last = service.list(&tenant(), 1, &query(3, 10, None)).await.unwrap();
    assert_eq!(last.data.len(), 5);
    assert!(!last.has_next_page);

    let beyond = service.list(&tenant(), 1, &query(9, 10, None)).await.unwrap();
    assert!(beyond.data.is_empty());
    assert_eq!(beyond.total_count, 25);
}

#[tokio::test]
async fn search_without_matches_is_an_empty_page() {
    let fixture = Fixture {
        names: vec!["Alpha".to_string(), "Beta".to_string()],
        grants: [(1, 1), (2, 1)].into_iter().collect(),
    };
    let service = service_for(&fixture);

    let page = service
        .list(&tenant(), 1, &query(1, 10, Some("zzz")))
        .await
        .unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.total_count, 0);
    assert_eq!(page.total_pages, 0);
    assert!(!page.has_next_page);
    assert!(!page.has_previous_page);

    // Wildcard characters are matched literally
    let page = service
        .list(&tenant(), 1, &query(1, 10, Some("%")))
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
}
