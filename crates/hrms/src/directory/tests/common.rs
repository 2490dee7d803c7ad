use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::auth::domain::{AuthContext, User, UserId, UserType};
use crate::auth::repository::UserRepository;
use crate::directory::domain::{CreateCompany, CreateDepartment, CreateEmployee, EmployeeCategory};
use crate::directory::service::DirectoryService;
use crate::store::InMemoryHrStore;

pub(super) fn store() -> Arc<InMemoryHrStore> {
    Arc::new(InMemoryHrStore::new())
}

pub(super) fn service(store: &Arc<InMemoryHrStore>) -> DirectoryService<InMemoryHrStore> {
    DirectoryService::new(store.clone())
}

/// Insert an identity record and return a matching request context.
pub(super) fn insert_user(
    store: &InMemoryHrStore,
    username: &str,
    email: &str,
    user_type: UserType,
) -> AuthContext {
    let now = Utc::now();
    let user = store
        .insert_user(User {
            id: UserId::generate(),
            username: username.to_string(),
            email: email.to_string(),
            first_name: "Alex".to_string(),
            user_type,
            profile_picture: None,
            google_id: None,
            company_id: None,
            password_hash: "hash:secret".to_string(),
            created_at: now,
            updated_at: now,
        })
        .expect("insert user");
    AuthContext {
        user_id: user.id,
        company_id: None,
        user_type,
    }
}

pub(super) fn refreshed(store: &InMemoryHrStore, ctx: AuthContext) -> AuthContext {
    let user = store
        .fetch_user(ctx.user_id)
        .expect("fetch user")
        .expect("user exists");
    AuthContext {
        user_id: user.id,
        company_id: user.company_id,
        user_type: user.user_type,
    }
}

pub(super) fn company_input(name: &str, email: &str) -> CreateCompany {
    CreateCompany {
        name: name.to_string(),
        email: email.to_string(),
        owner_name: Some("Alex".to_string()),
        industry: Some("logistics".to_string()),
        size: Some("11-50".to_string()),
        address: Some("1 Depot Way".to_string()),
        country_code: Some("+31".to_string()),
        phone: Some("0612345678".to_string()),
        logo: None,
        tax_id: None,
        website: None,
    }
}

pub(super) fn department_input(name: &str) -> CreateDepartment {
    CreateDepartment {
        name: name.to_string(),
        description: String::new(),
        head: None,
        leave_allotments: Default::default(),
    }
}

pub(super) fn employee_input(code: &str, user_id: UserId) -> CreateEmployee {
    CreateEmployee {
        employee_code: code.to_string(),
        user_id,
        first_name: "Sam".to_string(),
        category: EmployeeCategory::InOffice,
        joining_date: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
        department_id: None,
        contact: None,
        bank_details: None,
        emergency_contact: None,
        date_of_birth: None,
        documents: None,
    }
}
