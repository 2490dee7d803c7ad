//! Effective-policy resolution.
//!
//! Resolution is first-match-wins over an ordered list of scope selectors,
//! most specific first. Levels are never merged: an employee-level override
//! entirely supersedes a department or company policy of the same type.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::directory::domain::{CompanyId, Employee};
use crate::error::DomainError;

use super::domain::{Policy, PolicyType};
use super::repository::{PolicyRepository, ScopeSelector};

pub struct PolicyResolver<S> {
    store: Arc<S>,
}

impl<S> PolicyResolver<S>
where
    S: PolicyRepository,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The candidate levels for one requester, most specific first.
    ///
    /// An employee with no department skips straight from their own
    /// overrides to the company default; a requester with no employee
    /// record (typically an admin) starts at the company level.
    fn candidates(employee: Option<&Employee>) -> Vec<ScopeSelector> {
        let mut selectors = Vec::with_capacity(3);
        if let Some(employee) = employee {
            selectors.push(ScopeSelector::Employee(employee.id));
            if let Some(department_id) = employee.department_id {
                selectors.push(ScopeSelector::Department(department_id));
            }
        }
        selectors.push(ScopeSelector::Company);
        selectors
    }

    /// Resolve the single applicable policy for one type, or `None` when no
    /// level has one (callers treat that as "unset").
    pub fn resolve_one(
        &self,
        company_id: CompanyId,
        employee: Option<&Employee>,
        policy_type: PolicyType,
    ) -> Result<Option<Policy>, DomainError> {
        for selector in Self::candidates(employee) {
            if let Some(policy) =
                self.store
                    .find_policy_scoped(company_id, policy_type, selector)?
            {
                return Ok(Some(policy));
            }
        }
        Ok(None)
    }

    /// Walk every known policy type for the requester.
    pub fn resolve_effective_policies(
        &self,
        company_id: CompanyId,
        employee: Option<&Employee>,
    ) -> Result<BTreeMap<PolicyType, Option<Policy>>, DomainError> {
        let mut resolved = BTreeMap::new();
        for policy_type in PolicyType::ALL {
            let policy = self.resolve_one(company_id, employee, policy_type)?;
            resolved.insert(policy_type, policy);
        }
        Ok(resolved)
    }

    /// All policies at exactly one scope, no precedence walk. Used for
    /// administrative display and editing.
    pub fn list_policies(
        &self,
        company_id: CompanyId,
        selector: ScopeSelector,
    ) -> Result<Vec<Policy>, DomainError> {
        Ok(self.store.list_policies_scoped(company_id, selector)?)
    }
}
