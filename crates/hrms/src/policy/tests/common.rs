use std::collections::HashMap;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};

use crate::auth::collaborators::IdentityVerifier;
use crate::auth::domain::{AuthContext, UserId, UserType};
use crate::directory::domain::{
    Company, CompanyId, Department, DepartmentId, Employee, EmployeeCategory, EmployeeId,
};
use crate::directory::repository::{CompanyRepository, DepartmentRepository, EmployeeRepository};
use crate::error::DomainError;
use crate::policy::domain::{Policy, PolicyDraft, PolicyType};
use crate::policy::mutator::PolicyMutator;
use crate::policy::router::{policy_router, PolicyRouterState};
use crate::policy::service::PolicyService;
use crate::store::InMemoryHrStore;

/// Two-tenant world: `company` has an engineering department with one
/// member (`dev`) plus one employee without a department (`floater`);
/// `other_company` is there to prove the tenant fence holds.
pub(super) struct Fixture {
    pub store: Arc<InMemoryHrStore>,
    pub company: CompanyId,
    pub other_company: CompanyId,
    pub engineering: DepartmentId,
    pub dev: Employee,
    pub floater: Employee,
    pub admin: AuthContext,
    pub other_admin: AuthContext,
    pub member: AuthContext,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryHrStore::new());

        let company = insert_company(&store, "Acme Logistics", "ops@acme.example");
        let other_company = insert_company(&store, "Globex", "hr@globex.example");

        let engineering = insert_department(&store, company, "Engineering");

        let dev_user = UserId::generate();
        let dev = insert_employee(&store, company, Some(engineering), dev_user, "EMP-0001");
        let floater_user = UserId::generate();
        let floater = insert_employee(&store, company, None, floater_user, "EMP-0002");

        let admin = AuthContext {
            user_id: UserId::generate(),
            company_id: Some(company),
            user_type: UserType::Admin,
        };
        let other_admin = AuthContext {
            user_id: UserId::generate(),
            company_id: Some(other_company),
            user_type: UserType::Admin,
        };
        let member = AuthContext {
            user_id: dev_user,
            company_id: Some(company),
            user_type: UserType::Employee,
        };

        Self {
            store,
            company,
            other_company,
            engineering,
            dev,
            floater,
            admin,
            other_admin,
            member,
        }
    }

    pub fn mutator(&self) -> PolicyMutator<InMemoryHrStore> {
        PolicyMutator::new(self.store.clone())
    }

    pub fn service(&self) -> PolicyService<InMemoryHrStore> {
        PolicyService::new(self.store.clone())
    }

    /// Seed a policy straight through the mutator, skipping authorization.
    pub fn seed(&self, draft: &PolicyDraft) -> Policy {
        self.mutator().create(draft).expect("seed policy")
    }
}

pub(super) fn insert_company(store: &InMemoryHrStore, name: &str, email: &str) -> CompanyId {
    let now = Utc::now();
    let company = Company {
        id: CompanyId::generate(),
        name: name.to_string(),
        owner_name: None,
        email: email.to_string(),
        industry: Some("logistics".to_string()),
        size: Some("51-200".to_string()),
        address: Some("1 Depot Way".to_string()),
        country_code: Some("+31".to_string()),
        phone: Some("0612345678".to_string()),
        logo: None,
        tax_id: None,
        website: None,
        created_at: now,
        updated_at: now,
    };
    store.insert_company(company).expect("insert company").id
}

pub(super) fn insert_department(
    store: &InMemoryHrStore,
    company_id: CompanyId,
    name: &str,
) -> DepartmentId {
    let now = Utc::now();
    let department = Department {
        id: DepartmentId::generate(),
        company_id,
        name: name.to_string(),
        description: String::new(),
        head: None,
        leave_allotments: Default::default(),
        created_at: now,
        updated_at: now,
    };
    store
        .insert_department(department)
        .expect("insert department")
        .id
}

pub(super) fn insert_employee(
    store: &InMemoryHrStore,
    company_id: CompanyId,
    department_id: Option<DepartmentId>,
    user_id: UserId,
    code: &str,
) -> Employee {
    let now = Utc::now();
    let employee = Employee {
        id: EmployeeId::generate(),
        employee_code: code.to_string(),
        user_id,
        company_id,
        department_id,
        first_name: "Sam".to_string(),
        category: EmployeeCategory::InOffice,
        joining_date: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
        contact: None,
        bank_details: None,
        emergency_contact: None,
        date_of_birth: None,
        documents: None,
        created_at: now,
        updated_at: now,
    };
    store.insert_employee(employee).expect("insert employee")
}

/// Blank draft to be scoped by the caller.
pub(super) fn draft(policy_type: PolicyType) -> PolicyDraft {
    PolicyDraft {
        company: None,
        department: None,
        employee: None,
        policy_type,
        title: format!("{} policy", policy_type.label()),
        details: json!({ "days": 20 }),
        effective_date: None,
    }
}

pub(super) fn company_draft(fixture: &Fixture, policy_type: PolicyType) -> PolicyDraft {
    PolicyDraft {
        company: Some(fixture.company),
        ..draft(policy_type)
    }
}

pub(super) fn department_draft(fixture: &Fixture, policy_type: PolicyType) -> PolicyDraft {
    PolicyDraft {
        department: Some(fixture.engineering),
        ..draft(policy_type)
    }
}

pub(super) fn employee_draft(fixture: &Fixture, policy_type: PolicyType) -> PolicyDraft {
    PolicyDraft {
        employee: Some(fixture.dev.id),
        ..draft(policy_type)
    }
}

/// Token-to-identity table standing in for a real verifier in router tests.
#[derive(Default)]
pub(super) struct StaticIdentity {
    tokens: HashMap<String, AuthContext>,
}

impl StaticIdentity {
    pub fn with(tokens: Vec<(&str, AuthContext)>) -> Self {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(token, ctx)| (token.to_string(), ctx))
                .collect(),
        }
    }
}

impl IdentityVerifier for StaticIdentity {
    fn verify(&self, bearer: &str) -> Result<AuthContext, DomainError> {
        self.tokens
            .get(bearer)
            .copied()
            .ok_or(DomainError::Unauthenticated)
    }
}

/// Router wired to the fixture store with `admin-token` and `member-token`
/// identities.
pub(super) fn policy_app(fixture: &Fixture) -> axum::Router {
    let identity = Arc::new(StaticIdentity::with(vec![
        ("admin-token", fixture.admin),
        ("member-token", fixture.member),
        ("other-admin-token", fixture.other_admin),
    ]));
    policy_router(PolicyRouterState {
        service: Arc::new(fixture.service()),
        identity,
    })
}

pub(super) async fn read_envelope(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let value: Value = serde_json::from_slice(&body).expect("json body");
    (status, value)
}
