//! Shared in-process entity store.
//!
//! Every table lives behind one mutex, so each repository call is a single
//! atomic section: normalize-then-check-then-write sequences cannot
//! interleave, and the scope-key unique index rejects a racing duplicate
//! even when both requests passed the mutator's pre-check.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::auth::domain::{User, UserId};
use crate::auth::repository::UserRepository;
use crate::directory::domain::{Company, CompanyId, Department, DepartmentId, Employee, EmployeeId};
use crate::directory::repository::{CompanyRepository, DepartmentRepository, EmployeeRepository};
use crate::error::RepositoryError;
use crate::policy::domain::{Policy, PolicyId, PolicyScopeKey, PolicyType};
use crate::policy::repository::{BatchConflict, PolicyRepository, ScopeSelector};

/// Umbrella bound for services that read and write across entity tables.
pub trait HrStore:
    CompanyRepository + DepartmentRepository + EmployeeRepository + UserRepository + PolicyRepository
{
}

impl<S> HrStore for S where
    S: CompanyRepository
        + DepartmentRepository
        + EmployeeRepository
        + UserRepository
        + PolicyRepository
{
}

#[derive(Default)]
struct Tables {
    companies: HashMap<CompanyId, Company>,
    departments: HashMap<DepartmentId, Department>,
    employees: HashMap<EmployeeId, Employee>,
    users: HashMap<UserId, User>,
    policies: HashMap<PolicyId, Policy>,
    /// Unique index over `(company, type, employee, department)`.
    policy_index: HashMap<PolicyScopeKey, PolicyId>,
}

/// In-memory store backing every repository trait.
#[derive(Default, Clone)]
pub struct InMemoryHrStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryHrStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("store mutex poisoned")
    }
}

impl CompanyRepository for InMemoryHrStore {
    fn insert_company(&self, company: Company) -> Result<Company, RepositoryError> {
        let mut tables = self.lock();
        let email_taken = tables
            .companies
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&company.email));
        if email_taken || tables.companies.contains_key(&company.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.companies.insert(company.id, company.clone());
        Ok(company)
    }

    fn fetch_company(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        Ok(self.lock().companies.get(&id).cloned())
    }

    fn update_company(&self, company: Company) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        if !tables.companies.contains_key(&company.id) {
            return Err(RepositoryError::NotFound);
        }
        tables.companies.insert(company.id, company);
        Ok(())
    }
}

impl DepartmentRepository for InMemoryHrStore {
    fn insert_department(&self, department: Department) -> Result<Department, RepositoryError> {
        let mut tables = self.lock();
        let name_taken = tables.departments.values().any(|existing| {
            existing.company_id == department.company_id && existing.name == department.name
        });
        if name_taken || tables.departments.contains_key(&department.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.departments.insert(department.id, department.clone());
        Ok(department)
    }

    fn fetch_department(&self, id: DepartmentId) -> Result<Option<Department>, RepositoryError> {
        Ok(self.lock().departments.get(&id).cloned())
    }

    fn list_departments(&self, company_id: CompanyId) -> Result<Vec<Department>, RepositoryError> {
        let tables = self.lock();
        let mut departments: Vec<Department> = tables
            .departments
            .values()
            .filter(|department| department.company_id == company_id)
            .cloned()
            .collect();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    fn delete_department(&self, id: DepartmentId) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        if tables.departments.remove(&id).is_none() {
            return Err(RepositoryError::NotFound);
        }

        // Members survive with their department reference cleared.
        for employee in tables.employees.values_mut() {
            if employee.department_id == Some(id) {
                employee.department_id = None;
            }
        }

        let doomed: Vec<PolicyId> = tables
            .policies
            .values()
            .filter(|policy| policy.department_id == Some(id))
            .map(|policy| policy.id)
            .collect();
        for policy_id in doomed {
            if let Some(policy) = tables.policies.remove(&policy_id) {
                tables.policy_index.remove(&policy.scope_key());
            }
        }
        Ok(())
    }
}

impl EmployeeRepository for InMemoryHrStore {
    fn insert_employee(&self, employee: Employee) -> Result<Employee, RepositoryError> {
        let mut tables = self.lock();
        let taken = tables.employees.values().any(|existing| {
            existing.employee_code == employee.employee_code
                || existing.user_id == employee.user_id
        });
        if taken || tables.employees.contains_key(&employee.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    fn fetch_employee(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        Ok(self.lock().employees.get(&id).cloned())
    }

    fn fetch_employee_by_code(&self, code: &str) -> Result<Option<Employee>, RepositoryError> {
        Ok(self
            .lock()
            .employees
            .values()
            .find(|employee| employee.employee_code == code)
            .cloned())
    }

    fn fetch_employee_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<Employee>, RepositoryError> {
        Ok(self
            .lock()
            .employees
            .values()
            .find(|employee| employee.user_id == user_id)
            .cloned())
    }

    fn delete_employee(&self, id: EmployeeId) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        if tables.employees.remove(&id).is_none() {
            return Err(RepositoryError::NotFound);
        }

        // Head references are weak: null them rather than cascade.
        for department in tables.departments.values_mut() {
            if department.head == Some(id) {
                department.head = None;
            }
        }

        let doomed: Vec<PolicyId> = tables
            .policies
            .values()
            .filter(|policy| policy.employee_id == Some(id))
            .map(|policy| policy.id)
            .collect();
        for policy_id in doomed {
            if let Some(policy) = tables.policies.remove(&policy_id) {
                tables.policy_index.remove(&policy.scope_key());
            }
        }
        Ok(())
    }
}

impl UserRepository for InMemoryHrStore {
    fn insert_user(&self, user: User) -> Result<User, RepositoryError> {
        let mut tables = self.lock();
        let taken = tables.users.values().any(|existing| {
            existing.username == user.username
                || existing.email.eq_ignore_ascii_case(&user.email)
        });
        if taken || tables.users.contains_key(&user.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn fetch_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn fetch_user_by_email_and_company(
        &self,
        email: &str,
        company_id: CompanyId,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|user| {
                user.email.eq_ignore_ascii_case(email) && user.company_id == Some(company_id)
            })
            .cloned())
    }

    fn update_user(&self, user: User) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        if !tables.users.contains_key(&user.id) {
            return Err(RepositoryError::NotFound);
        }
        tables.users.insert(user.id, user);
        Ok(())
    }

    fn username_taken(&self, username: &str) -> Result<bool, RepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .any(|user| user.username == username))
    }
}

impl PolicyRepository for InMemoryHrStore {
    fn insert_policy(&self, policy: Policy) -> Result<Policy, RepositoryError> {
        let mut tables = self.lock();
        let key = policy.scope_key();
        if tables.policy_index.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        tables.policy_index.insert(key, policy.id);
        tables.policies.insert(policy.id, policy.clone());
        Ok(policy)
    }

    fn insert_policies(&self, policies: Vec<Policy>) -> Result<Vec<Policy>, BatchConflict> {
        let mut tables = self.lock();

        // Check the whole batch (against existing rows and itself) before
        // the first write.
        let mut incoming: HashMap<PolicyScopeKey, usize> = HashMap::new();
        for (index, policy) in policies.iter().enumerate() {
            let key = policy.scope_key();
            if tables.policy_index.contains_key(&key) || incoming.insert(key, index).is_some() {
                return Err(BatchConflict { index });
            }
        }

        for policy in &policies {
            tables.policy_index.insert(policy.scope_key(), policy.id);
            tables.policies.insert(policy.id, policy.clone());
        }
        Ok(policies)
    }

    fn update_policy(&self, policy: Policy) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        let previous = match tables.policies.get(&policy.id) {
            Some(existing) => existing.scope_key(),
            None => return Err(RepositoryError::NotFound),
        };
        let key = policy.scope_key();
        // A re-keyed row must not steal another policy's index entry.
        if key != previous && tables.policy_index.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        tables.policy_index.remove(&previous);
        tables.policy_index.insert(key, policy.id);
        tables.policies.insert(policy.id, policy);
        Ok(())
    }

    fn find_policy_by_key(
        &self,
        key: &PolicyScopeKey,
    ) -> Result<Option<Policy>, RepositoryError> {
        let tables = self.lock();
        Ok(tables
            .policy_index
            .get(key)
            .and_then(|id| tables.policies.get(id))
            .cloned())
    }

    fn find_policy_scoped(
        &self,
        company_id: CompanyId,
        policy_type: PolicyType,
        selector: ScopeSelector,
    ) -> Result<Option<Policy>, RepositoryError> {
        let tables = self.lock();
        Ok(tables
            .policies
            .values()
            .find(|policy| {
                policy.company_id == company_id
                    && policy.policy_type == policy_type
                    && selector.matches(policy)
            })
            .cloned())
    }

    fn list_policies_scoped(
        &self,
        company_id: CompanyId,
        selector: ScopeSelector,
    ) -> Result<Vec<Policy>, RepositoryError> {
        let tables = self.lock();
        let mut policies: Vec<Policy> = tables
            .policies
            .values()
            .filter(|policy| policy.company_id == company_id && selector.matches(policy))
            .cloned()
            .collect();
        policies.sort_by(|a, b| {
            let type_order = |ty: PolicyType| {
                PolicyType::ALL
                    .iter()
                    .position(|candidate| *candidate == ty)
                    .unwrap_or(PolicyType::ALL.len())
            };
            type_order(a.policy_type)
                .cmp(&type_order(b.policy_type))
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(policies)
    }
}
