use super::common::*;

use uuid::Uuid;

use crate::error::DomainError;
use crate::policy::domain::PolicyType;
use crate::policy::service::ListScope;

#[test]
fn non_admins_cannot_create_policies() {
    let fixture = Fixture::new();
    let err = fixture
        .service()
        .create(&fixture.member, &company_draft(&fixture, PolicyType::Leave))
        .expect_err("member is not an admin");
    assert!(matches!(err, DomainError::Authorization { .. }));
}

#[test]
fn cross_tenant_draft_fails_closed() {
    let fixture = Fixture::new();
    // The draft resolves to the dev's company, which is not the requesting
    // admin's. Must be an authorization error, never a not-found.
    let err = fixture
        .service()
        .create(
            &fixture.other_admin,
            &employee_draft(&fixture, PolicyType::Leave),
        )
        .expect_err("foreign tenant");
    assert!(matches!(err, DomainError::Authorization { .. }));
}

#[test]
fn listing_a_foreign_department_fails_closed() {
    let fixture = Fixture::new();
    let err = fixture
        .service()
        .list(
            &fixture.other_admin,
            ListScope::Department,
            Some(fixture.engineering.0),
        )
        .expect_err("foreign department");
    assert!(matches!(err, DomainError::Authorization { .. }));
}

#[test]
fn listing_an_unknown_scope_id_fails_closed() {
    let fixture = Fixture::new();
    let err = fixture
        .service()
        .list(&fixture.admin, ListScope::Employee, Some(Uuid::new_v4()))
        .expect_err("unknown employee id");
    assert!(matches!(err, DomainError::Authorization { .. }));
}

#[test]
fn listing_requires_admin() {
    let fixture = Fixture::new();
    let err = fixture
        .service()
        .list(&fixture.member, ListScope::Company, None)
        .expect_err("member is not an admin");
    assert!(matches!(err, DomainError::Authorization { .. }));
}

#[test]
fn department_and_employee_listing_require_a_scope_id() {
    let fixture = Fixture::new();
    let err = fixture
        .service()
        .list(&fixture.admin, ListScope::Department, None)
        .expect_err("missing scope_id");
    match err {
        DomainError::Validation { field, .. } => assert_eq!(field, Some("scope_id")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn members_may_resolve_their_own_effective_policies() {
    let fixture = Fixture::new();
    fixture.seed(&company_draft(&fixture, PolicyType::Leave));

    let resolved = fixture
        .service()
        .resolve_effective(&fixture.member)
        .expect("members read their own view");
    assert!(resolved[&PolicyType::Leave].is_some());
}

#[test]
fn admin_without_employee_record_resolves_from_company_level() {
    let fixture = Fixture::new();
    fixture.seed(&department_draft(&fixture, PolicyType::Leave));
    let company_level = fixture.seed(&company_draft(&fixture, PolicyType::Leave));

    let resolved = fixture
        .service()
        .resolve_effective(&fixture.admin)
        .expect("resolve");
    let leave = resolved[&PolicyType::Leave].as_ref().expect("company default");
    assert_eq!(leave.id, company_level.id);
}

#[test]
fn batch_create_is_gated_per_item() {
    let fixture = Fixture::new();
    let batch = vec![
        company_draft(&fixture, PolicyType::Leave),
        employee_draft(&fixture, PolicyType::Attendance),
    ];

    // Both items resolve into a foreign tenant from this admin's view.
    let err = fixture
        .service()
        .create_batch(&fixture.other_admin, &batch)
        .expect_err("batch crosses tenants");
    assert!(matches!(err, DomainError::Authorization { .. }));
}

#[test]
fn empty_batch_is_a_validation_error() {
    let fixture = Fixture::new();
    let err = fixture
        .service()
        .create_batch(&fixture.admin, &[])
        .expect_err("empty batch");
    assert!(matches!(err, DomainError::Validation { .. }));
}
