/// Integration tests for the partial-update applier
///
/// These tests require a running PostgreSQL database (DATABASE_URL).
/// Run with: cargo test --test patch_applier_tests

mod common;

use devmatch_shared::models::{company::Company, company_info::CompanyInfo, project::Project};
use devmatch_shared::patch::{
    apply_patch, apply_patch_with, ConcurrencyControl, PatchDocument, PatchError, PatchOptions,
    PatchTarget,
};
use serde_json::json;
use uuid::Uuid;

fn patch_of(pairs: &[(&str, serde_json::Value)]) -> PatchDocument {
    let mut patch = PatchDocument::new();
    for (key, value) in pairs {
        patch.insert(key.to_string(), value.clone());
    }
    patch
}

#[tokio::test]
async fn test_patch_changes_only_named_fields() {
    let pool = common::test_pool().await;
    let company = common::create_test_company(&pool).await;
    let info = common::create_test_company_info(&pool, company.id).await;

    let updated: CompanyInfo = apply_patch(&pool, info.id, &patch_of(&[("ceo", json!("Bob"))]))
        .await
        .expect("Patch should succeed");

    assert_eq!(updated.ceo, "Bob");
    assert_eq!(updated.address, info.address);
    assert_eq!(updated.company_call, info.company_call);
    assert_eq!(updated.registration_number, info.registration_number);
    assert_eq!(updated.registration_file, info.registration_file);
    assert_eq!(updated.company_id, info.company_id);

    // Exactly one write happened
    assert_eq!(updated.version, info.version + 1);

    // And the change is durable
    let reloaded = CompanyInfo::find_by_id(&pool, info.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.ceo, "Bob");
}

#[tokio::test]
async fn test_multi_field_patch_is_one_write() {
    let pool = common::test_pool().await;
    let company = common::create_test_company(&pool).await;
    let info = common::create_test_company_info(&pool, company.id).await;

    let updated: CompanyInfo = apply_patch(
        &pool,
        info.id,
        &patch_of(&[
            ("ceo", json!("Bob")),
            ("address", json!("45 Gangnam-daero, Seoul")),
            ("registration_number", json!(null)),
        ]),
    )
    .await
    .expect("Patch should succeed");

    assert_eq!(updated.ceo, "Bob");
    assert_eq!(updated.address, "45 Gangnam-daero, Seoul");
    assert_eq!(updated.registration_number, None);
    assert_eq!(updated.version, info.version + 1);
}

#[tokio::test]
async fn test_unknown_field_rejected_with_no_mutation() {
    let pool = common::test_pool().await;
    let company = common::create_test_company(&pool).await;
    let info = common::create_test_company_info(&pool, company.id).await;

    // One valid key and one unknown key: the whole patch must be rejected
    // before anything is written.
    let err = apply_patch::<CompanyInfo>(
        &pool,
        info.id,
        &patch_of(&[("ceo", json!("Bob")), ("hometown", json!("Seoul"))]),
    )
    .await
    .expect_err("Unknown field should fail the patch");

    assert!(matches!(err, PatchError::UnknownField { .. }));

    let reloaded = CompanyInfo::find_by_id(&pool, info.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.ceo, info.ceo);
    assert_eq!(reloaded.version, info.version);
}

#[tokio::test]
async fn test_missing_entity_is_not_found() {
    let pool = common::test_pool().await;

    let err = apply_patch::<CompanyInfo>(&pool, Uuid::new_v4(), &patch_of(&[("ceo", json!("Bob"))]))
        .await
        .expect_err("Patching a missing row should fail");

    assert!(matches!(err, PatchError::NotFound { .. }));
}

#[tokio::test]
async fn test_type_mismatch_is_coercion_error() {
    let pool = common::test_pool().await;
    let company = common::create_test_company(&pool).await;
    let info = common::create_test_company_info(&pool, company.id).await;

    let err = apply_patch::<CompanyInfo>(&pool, info.id, &patch_of(&[("ceo", json!(42))]))
        .await
        .expect_err("Numeric CEO should fail coercion");

    assert!(matches!(err, PatchError::TypeCoercion { .. }));

    let reloaded = CompanyInfo::find_by_id(&pool, info.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.ceo, info.ceo);
}

#[tokio::test]
async fn test_duplicate_unique_value_is_conflict() {
    let pool = common::test_pool().await;
    let first = common::create_test_company(&pool).await;
    let second = common::create_test_company(&pool).await;

    // The applier does not pre-validate uniqueness; the unique index fires
    // on persist and surfaces as DuplicateConstraint.
    let err = apply_patch::<Company>(
        &pool,
        second.id,
        &patch_of(&[("email", json!(first.email))]),
    )
    .await
    .expect_err("Duplicate email should fail");

    assert!(matches!(err, PatchError::DuplicateConstraint { .. }));
}

#[tokio::test]
async fn test_project_headcount_patch() {
    let pool = common::test_pool().await;
    let company = common::create_test_company(&pool).await;
    let project = common::create_test_project(&pool, company.id, "Search revamp").await;

    let updated: Project =
        apply_patch(&pool, project.id, &patch_of(&[("headcount", json!(7))]))
            .await
            .expect("Patch should succeed");

    assert_eq!(updated.headcount, Some(7));
    assert_eq!(updated.title, project.title);

    let err = apply_patch::<Project>(&pool, project.id, &patch_of(&[("headcount", json!("7"))]))
        .await
        .expect_err("String headcount should fail coercion");
    assert!(matches!(err, PatchError::TypeCoercion { .. }));
}

#[tokio::test]
async fn test_optimistic_patch_succeeds_on_fresh_row() {
    let pool = common::test_pool().await;
    let company = common::create_test_company(&pool).await;
    let info = common::create_test_company_info(&pool, company.id).await;

    let updated: CompanyInfo = apply_patch_with(
        &pool,
        info.id,
        &patch_of(&[("ceo", json!("Bob"))]),
        PatchOptions {
            concurrency: ConcurrencyControl::Optimistic,
        },
    )
    .await
    .expect("Optimistic patch on a fresh row should succeed");

    assert_eq!(updated.ceo, "Bob");
    assert_eq!(updated.version, info.version + 1);
}

#[tokio::test]
async fn test_stale_versioned_write_is_rejected() {
    let pool = common::test_pool().await;
    let company = common::create_test_company(&pool).await;
    let info = common::create_test_company_info(&pool, company.id).await;

    // Hold a stale copy while another patch bumps the version.
    let stale = CompanyInfo::find_by_id(&pool, info.id)
        .await
        .unwrap()
        .unwrap();

    let _: CompanyInfo = apply_patch(&pool, info.id, &patch_of(&[("ceo", json!("Bob"))]))
        .await
        .expect("First patch should succeed");

    let result = stale
        .persist_checked(&pool)
        .await
        .expect("Checked persist should not error");
    assert!(result.is_none(), "Stale versioned write must not apply");

    // Last-writer-wins mode would have clobbered silently; verify the
    // winner's value survived the stale attempt.
    let reloaded = CompanyInfo::find_by_id(&pool, info.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.ceo, "Bob");
}
