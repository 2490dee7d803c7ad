//! Policy create/update validation and persistence.
//!
//! The pipeline runs normalize → cross-entity invariants → conflict
//! pre-check → persist, and every step fails before any write. The store's
//! unique index remains the authoritative guard against racing creates.

use std::sync::Arc;

use chrono::Utc;

use crate::directory::domain::{Department, Employee};
use crate::directory::repository::{DepartmentRepository, EmployeeRepository};
use crate::error::DomainError;

use super::domain::{Policy, PolicyDraft, PolicyId, ScopeBinding};
use super::repository::PolicyRepository;

pub struct PolicyMutator<S> {
    store: Arc<S>,
}

impl<S> PolicyMutator<S>
where
    S: PolicyRepository + EmployeeRepository + DepartmentRepository,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn load_employee(&self, draft: &PolicyDraft) -> Result<Option<Employee>, DomainError> {
        match draft.employee {
            Some(id) => self
                .store
                .fetch_employee(id)?
                .ok_or_else(|| {
                    DomainError::validation_field("employee", "employee does not exist")
                })
                .map(Some),
            None => Ok(None),
        }
    }

    fn load_department(&self, draft: &PolicyDraft) -> Result<Option<Department>, DomainError> {
        match draft.department {
            Some(id) => self
                .store
                .fetch_department(id)?
                .ok_or_else(|| {
                    DomainError::validation_field("department", "department does not exist")
                })
                .map(Some),
            None => Ok(None),
        }
    }

    /// Pin the draft to a single scope. The most specific entity wins:
    /// an employee determines both department and company, a department
    /// determines the company, and a bare draft must name a company.
    pub fn normalize_scope(&self, draft: &PolicyDraft) -> Result<ScopeBinding, DomainError> {
        let employee = self.load_employee(draft)?;
        let department = self.load_department(draft)?;

        if let Some(employee) = &employee {
            // Payload-supplied department/company are overridden, not
            // merely checked, except that a department named explicitly
            // must still be consistent with the employee's membership.
            if let Some(department) = &department {
                if department.company_id != employee.company_id {
                    return Err(DomainError::validation_field(
                        "department",
                        "department must belong to the same company as the employee",
                    ));
                }
                if employee.department_id != Some(department.id) {
                    return Err(DomainError::validation_field(
                        "department",
                        "employee must belong to the specified department",
                    ));
                }
            }
            return Ok(ScopeBinding {
                company_id: employee.company_id,
                department_id: employee.department_id,
                employee_id: Some(employee.id),
            });
        }

        if let Some(department) = &department {
            return Ok(ScopeBinding {
                company_id: department.company_id,
                department_id: Some(department.id),
                employee_id: None,
            });
        }

        match draft.company {
            Some(company_id) => Ok(ScopeBinding {
                company_id,
                department_id: None,
                employee_id: None,
            }),
            None => Err(DomainError::validation_field(
                "company",
                "a policy with no employee and no department must declare a company",
            )),
        }
    }

    fn materialize(draft: &PolicyDraft, binding: ScopeBinding) -> Policy {
        let now = Utc::now();
        Policy {
            id: PolicyId::generate(),
            company_id: binding.company_id,
            department_id: binding.department_id,
            employee_id: binding.employee_id,
            policy_type: draft.policy_type,
            title: draft.title.clone(),
            details: draft.details.clone(),
            effective_date: draft.effective_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn validate_title(draft: &PolicyDraft) -> Result<(), DomainError> {
        if draft.title.trim().is_empty() {
            return Err(DomainError::validation_field(
                "title",
                "title must not be empty",
            ));
        }
        Ok(())
    }

    /// Validate and persist one new policy.
    pub fn create(&self, draft: &PolicyDraft) -> Result<Policy, DomainError> {
        Self::validate_title(draft)?;
        let binding = self.normalize_scope(draft)?;
        let key = binding.key(draft.policy_type);

        if self.store.find_policy_by_key(&key)?.is_some() {
            return Err(DomainError::conflict(
                "a policy of this type already exists at this scope; use update instead",
            ));
        }

        let policy = Self::materialize(draft, binding);
        self.store.insert_policy(policy).map_err(|_| {
            // Racing create slipped past the pre-check; the unique index
            // caught it.
            DomainError::conflict(
                "a policy of this type already exists at this scope; use update instead",
            )
        })
    }

    /// Validate every draft before any write; persist all or nothing.
    pub fn create_batch(&self, drafts: &[PolicyDraft]) -> Result<Vec<Policy>, DomainError> {
        let mut pending = Vec::with_capacity(drafts.len());
        for (index, draft) in drafts.iter().enumerate() {
            Self::validate_title(draft).map_err(|err| batch_item_error(index, err))?;
            let binding = self
                .normalize_scope(draft)
                .map_err(|err| batch_item_error(index, err))?;
            let key = binding.key(draft.policy_type);
            if self.store.find_policy_by_key(&key)?.is_some() {
                return Err(DomainError::conflict(format!(
                    "batch item {index} already exists at this scope; use update instead"
                )));
            }
            pending.push(Self::materialize(draft, binding));
        }

        self.store.insert_policies(pending).map_err(|conflict| {
            DomainError::conflict(format!(
                "batch item {} already exists at this scope; use update instead",
                conflict.index
            ))
        })
    }

    /// Locate the existing row by the scope tuple recomputed from the patch
    /// and update it in place. Policies are never versioned.
    pub fn update(&self, patch: &PolicyDraft) -> Result<Policy, DomainError> {
        Self::validate_title(patch)?;
        let binding = self.normalize_scope(patch)?;
        let key = binding.key(patch.policy_type);

        let mut policy = self
            .store
            .find_policy_by_key(&key)?
            .ok_or_else(|| DomainError::not_found("policy"))?;

        policy.title = patch.title.clone();
        policy.details = patch.details.clone();
        policy.effective_date = patch.effective_date;
        policy.updated_at = Utc::now();

        self.store.update_policy(policy.clone())?;
        Ok(policy)
    }
}

fn batch_item_error(index: usize, err: DomainError) -> DomainError {
    match err {
        DomainError::Validation { field, message } => DomainError::Validation {
            field,
            message: format!("batch item {index}: {message}"),
        },
        other => other,
    }
}
