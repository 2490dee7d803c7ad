//! Command-line walkthrough of the policy precedence model.
//!
//! Seeds one tenant with a company default, a department override, and a
//! personal arrangement, then prints the effective view for each employee.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::Args;
use serde_json::json;

use hrms::auth::collaborators::CredentialVault;
use hrms::auth::domain::{AuthContext, User, UserId, UserType};
use hrms::auth::repository::UserRepository;
use hrms::directory::domain::{CreateCompany, CreateDepartment, CreateEmployee, EmployeeCategory};
use hrms::directory::service::DirectoryService;
use hrms::error::{AppError, DomainError};
use hrms::policy::domain::{Policy, PolicyDraft, PolicyType};
use hrms::policy::service::PolicyService;
use hrms::store::InMemoryHrStore;

use crate::infra::PlainCredentialVault;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Emit the effective views as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryHrStore::new());
    let directory = DirectoryService::new(store.clone());
    let policies = PolicyService::new(store.clone());
    let vault = PlainCredentialVault;

    let admin_user = insert_user(
        &store,
        &vault,
        "demo_admin",
        "admin@acme.example",
        UserType::Admin,
    )?;
    let mut admin = AuthContext {
        user_id: admin_user.id,
        company_id: None,
        user_type: UserType::Admin,
    };

    let company = directory.provision_company(
        &admin,
        CreateCompany {
            name: "Acme Logistics".to_string(),
            email: "ops@acme.example".to_string(),
            owner_name: Some("Demo Admin".to_string()),
            industry: Some("logistics".to_string()),
            size: Some("51-200".to_string()),
            address: Some("1 Depot Way".to_string()),
            country_code: Some("+31".to_string()),
            phone: Some("0612345678".to_string()),
            logo: None,
            tax_id: None,
            website: None,
        },
    )?;
    admin.company_id = Some(company.id);

    let engineering = directory.create_department(
        &admin,
        CreateDepartment {
            name: "Engineering".to_string(),
            description: "Builds and runs the product".to_string(),
            head: None,
            leave_allotments: BTreeMap::from([("casual".to_string(), 12)]),
        },
    )?;

    let dev_user = insert_user(
        &store,
        &vault,
        "sam_dev",
        "sam@acme.example",
        UserType::Employee,
    )?;
    let dev = directory.create_employee(
        &admin,
        CreateEmployee {
            employee_code: "EMP-0001".to_string(),
            user_id: dev_user.id,
            first_name: "Sam".to_string(),
            category: EmployeeCategory::InOffice,
            joining_date: demo_date(2024, 3, 1),
            department_id: Some(engineering.id),
            contact: None,
            bank_details: None,
            emergency_contact: None,
            date_of_birth: None,
            documents: None,
        },
    )?;

    let courier_user = insert_user(
        &store,
        &vault,
        "kim_courier",
        "kim@acme.example",
        UserType::FieldEmployee,
    )?;
    let courier = directory.create_employee(
        &admin,
        CreateEmployee {
            employee_code: "EMP-0002".to_string(),
            user_id: courier_user.id,
            first_name: "Kim".to_string(),
            category: EmployeeCategory::Field,
            joining_date: demo_date(2024, 6, 15),
            department_id: None,
            contact: None,
            bank_details: None,
            emergency_contact: None,
            date_of_birth: None,
            documents: None,
        },
    )?;

    // Company defaults, a department override, and a personal arrangement.
    policies.create_batch(
        &admin,
        &[
            PolicyDraft {
                company: Some(company.id),
                ..draft(PolicyType::Leave, "Annual leave", json!({ "days": 20 }))
            },
            PolicyDraft {
                company: Some(company.id),
                ..draft(
                    PolicyType::Late,
                    "Late arrivals",
                    json!({ "grace_minutes": 10 }),
                )
            },
        ],
    )?;
    policies.create(
        &admin,
        &PolicyDraft {
            department: Some(engineering.id),
            ..draft(
                PolicyType::Late,
                "Engineering late arrivals",
                json!({ "grace_minutes": 5 }),
            )
        },
    )?;
    policies.create(
        &admin,
        &PolicyDraft {
            employee: Some(dev.id),
            ..draft(PolicyType::Leave, "Negotiated leave", json!({ "days": 30 }))
        },
    )?;

    for (label, employee) in [("Sam (Engineering)", &dev), ("Kim (no department)", &courier)] {
        let ctx = AuthContext {
            user_id: employee.user_id,
            company_id: Some(company.id),
            user_type: UserType::Employee,
        };
        let resolved = policies.resolve_effective(&ctx)?;

        println!("\nEffective policies for {label}:");
        if args.json {
            let mut body = serde_json::Map::new();
            for (policy_type, policy) in &resolved {
                body.insert(
                    policy_type.label().to_string(),
                    policy
                        .as_ref()
                        .map(|policy| json!(policy))
                        .unwrap_or(serde_json::Value::Null),
                );
            }
            let rendered = serde_json::to_string_pretty(&body)
                .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, err)))?;
            println!("{rendered}");
        } else {
            for (policy_type, policy) in &resolved {
                match policy {
                    Some(policy) => println!(
                        "  {:<14} {:<12} {}",
                        policy_type.label(),
                        scope_label(policy),
                        policy.title
                    ),
                    None => println!("  {:<14} {:<12} -", policy_type.label(), "unset"),
                }
            }
        }
    }

    Ok(())
}

fn scope_label(policy: &Policy) -> &'static str {
    if policy.employee_id.is_some() {
        "employee"
    } else if policy.department_id.is_some() {
        "department"
    } else {
        "company"
    }
}

// Literal dates in the seed script are known valid.
fn demo_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date")
}

fn insert_user(
    store: &InMemoryHrStore,
    vault: &PlainCredentialVault,
    username: &str,
    email: &str,
    user_type: UserType,
) -> Result<User, AppError> {
    let now = Utc::now();
    let user = store
        .insert_user(User {
            id: UserId::generate(),
            username: username.to_string(),
            email: email.to_string(),
            first_name: username.to_string(),
            user_type,
            profile_picture: None,
            google_id: None,
            company_id: None,
            password_hash: vault.hash("demo-password"),
            created_at: now,
            updated_at: now,
        })
        .map_err(DomainError::from)?;
    Ok(user)
}

fn draft(policy_type: PolicyType, title: &str, details: serde_json::Value) -> PolicyDraft {
    PolicyDraft {
        company: None,
        department: None,
        employee: None,
        policy_type,
        title: title.to_string(),
        details,
        effective_date: None,
    }
}
