/// Integration tests for the tag-filtered project queries
///
/// These tests require a running PostgreSQL database (DATABASE_URL).
/// Run with: cargo test --test project_query_tests
///
/// Every test builds the same shape of fixture as the canonical scenario:
/// relation table {(P1,Java),(P1,Go),(P2,Go),(P3,Rust)} — with uniquely
/// named techs so parallel tests don't observe each other's rows.

mod common;

use devmatch_shared::models::project::Project;
use devmatch_shared::models::project_tech::{
    projects_for_techs, projects_for_techs_paged, techs_for_project, ProjectTech,
};
use devmatch_shared::models::tech::Tech;
use sqlx::PgPool;
use uuid::Uuid;

struct Fixture {
    p1: Project,
    p2: Project,
    p3: Project,
    java: Tech,
    go: Tech,
    rust: Tech,
}

async fn build_fixture(pool: &PgPool) -> Fixture {
    let company = common::create_test_company(pool).await;

    let p1 = common::create_test_project(pool, company.id, "Backend overhaul").await;
    let p2 = common::create_test_project(pool, company.id, "Gateway rewrite").await;
    let p3 = common::create_test_project(pool, company.id, "CLI tooling").await;

    // Prefixes sort go < java < rust regardless of the unique suffix
    let java = common::create_test_tech(pool, "java").await;
    let go = common::create_test_tech(pool, "go").await;
    let rust = common::create_test_tech(pool, "rust").await;

    assert!(ProjectTech::attach(pool, p1.id, java.id).await.unwrap());
    assert!(ProjectTech::attach(pool, p1.id, go.id).await.unwrap());
    assert!(ProjectTech::attach(pool, p2.id, go.id).await.unwrap());
    assert!(ProjectTech::attach(pool, p3.id, rust.id).await.unwrap());

    Fixture {
        p1,
        p2,
        p3,
        java,
        go,
        rust,
    }
}

fn ids(projects: &[Project]) -> Vec<Uuid> {
    projects.iter().map(|p| p.id).collect()
}

#[tokio::test]
async fn test_techs_for_project_in_stable_name_order() {
    let pool = common::test_pool().await;
    let fx = build_fixture(&pool).await;

    let techs = techs_for_project(&pool, fx.p1.id).await.unwrap();

    assert_eq!(techs.len(), 2);
    assert_eq!(techs[0].id, fx.go.id);
    assert_eq!(techs[1].id, fx.java.id);

    let none = techs_for_project(&pool, Uuid::new_v4()).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_projects_for_techs_union_and_dedup() {
    let pool = common::test_pool().await;
    let fx = build_fixture(&pool).await;

    // P1 matches both Java and Go but appears once
    let matched = projects_for_techs(&pool, &[fx.java.id, fx.go.id])
        .await
        .unwrap();

    assert_eq!(matched.len(), 2);
    let matched_ids = ids(&matched);
    assert!(matched_ids.contains(&fx.p1.id));
    assert!(matched_ids.contains(&fx.p2.id));
    assert!(!matched_ids.contains(&fx.p3.id));
}

#[tokio::test]
async fn test_projects_for_empty_tech_set_is_empty() {
    let pool = common::test_pool().await;
    let _fx = build_fixture(&pool).await;

    let matched = projects_for_techs(&pool, &[]).await.unwrap();
    assert!(matched.is_empty());
}

#[tokio::test]
async fn test_membership_requires_a_matching_relation_row() {
    let pool = common::test_pool().await;
    let fx = build_fixture(&pool).await;

    let rust_only = projects_for_techs(&pool, &[fx.rust.id]).await.unwrap();
    assert_eq!(ids(&rust_only), vec![fx.p3.id]);

    let java_only = projects_for_techs(&pool, &[fx.java.id]).await.unwrap();
    assert_eq!(ids(&java_only), vec![fx.p1.id]);
}

#[tokio::test]
async fn test_duplicate_attach_does_not_duplicate_results() {
    let pool = common::test_pool().await;
    let fx = build_fixture(&pool).await;

    // Second attach of the same pair is a no-op
    let inserted = ProjectTech::attach(&pool, fx.p1.id, fx.java.id).await.unwrap();
    assert!(!inserted);

    let matched = projects_for_techs(&pool, &[fx.java.id]).await.unwrap();
    assert_eq!(matched.len(), 1);
}

#[tokio::test]
async fn test_paged_query_counts_full_match_set() {
    let pool = common::test_pool().await;
    let fx = build_fixture(&pool).await;
    let all_techs = [fx.java.id, fx.go.id, fx.rust.id];

    let page = projects_for_techs_paged(&pool, &all_techs, 2, 0).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_count, 3);
    assert!(page.total_count >= page.items.len() as i64);

    // Stable id order: the page is the first slice of the sorted match set
    let mut expected = vec![fx.p1.id, fx.p2.id, fx.p3.id];
    expected.sort();
    assert_eq!(ids(&page.items), expected[..2].to_vec());

    // The next page picks up exactly where the first left off
    let rest = projects_for_techs_paged(&pool, &all_techs, 2, 2).await.unwrap();
    assert_eq!(ids(&rest.items), expected[2..].to_vec());
    assert_eq!(rest.total_count, 3);
}

#[tokio::test]
async fn test_paged_query_offset_past_end() {
    let pool = common::test_pool().await;
    let fx = build_fixture(&pool).await;

    let page = projects_for_techs_paged(&pool, &[fx.java.id, fx.go.id], 10, 50)
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 2);
}

#[tokio::test]
async fn test_paged_query_empty_tech_set() {
    let pool = common::test_pool().await;
    let _fx = build_fixture(&pool).await;

    let page = projects_for_techs_paged(&pool, &[], 10, 0).await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn test_paged_dedup_is_consistent_between_items_and_count() {
    let pool = common::test_pool().await;
    let fx = build_fixture(&pool).await;

    // P1 has two matching relation rows; neither pass may count it twice.
    let page = projects_for_techs_paged(&pool, &[fx.java.id, fx.go.id], 10, 0)
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_count, 2);
}
