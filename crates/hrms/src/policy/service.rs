use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::auth::domain::AuthContext;
use crate::directory::domain::{DepartmentId, Employee, EmployeeId};
use crate::directory::repository::{DepartmentRepository, EmployeeRepository};
use crate::error::DomainError;
use crate::store::HrStore;

use super::authz;
use super::domain::{Policy, PolicyDraft, PolicyType};
use super::mutator::PolicyMutator;
use super::repository::ScopeSelector;
use super::resolver::PolicyResolver;

/// Scope name accepted by the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListScope {
    Company,
    Department,
    Employee,
}

/// Facade composing the authorization gate, mutator, and resolver.
pub struct PolicyService<S> {
    store: Arc<S>,
    mutator: PolicyMutator<S>,
    resolver: PolicyResolver<S>,
}

impl<S> PolicyService<S>
where
    S: HrStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            mutator: PolicyMutator::new(store.clone()),
            resolver: PolicyResolver::new(store.clone()),
            store,
        }
    }

    fn authorize_draft(&self, ctx: &AuthContext, draft: &PolicyDraft) -> Result<(), DomainError> {
        authz::require_admin(ctx)?;
        let binding = self.mutator.normalize_scope(draft)?;
        authz::require_same_company(ctx, binding.company_id)?;
        Ok(())
    }

    pub fn create(&self, ctx: &AuthContext, draft: &PolicyDraft) -> Result<Policy, DomainError> {
        self.authorize_draft(ctx, draft)?;
        self.mutator.create(draft)
    }

    pub fn create_batch(
        &self,
        ctx: &AuthContext,
        drafts: &[PolicyDraft],
    ) -> Result<Vec<Policy>, DomainError> {
        authz::require_admin(ctx)?;
        if drafts.is_empty() {
            return Err(DomainError::validation("batch must not be empty"));
        }
        for draft in drafts {
            let binding = self.mutator.normalize_scope(draft)?;
            authz::require_same_company(ctx, binding.company_id)?;
        }
        self.mutator.create_batch(drafts)
    }

    pub fn update(&self, ctx: &AuthContext, patch: &PolicyDraft) -> Result<Policy, DomainError> {
        self.authorize_draft(ctx, patch)?;
        self.mutator.update(patch)
    }

    /// Resolve a listing scope to a selector, failing closed on unknown or
    /// out-of-tenant ids.
    fn selector_for(
        &self,
        ctx: &AuthContext,
        scope: ListScope,
        scope_id: Option<Uuid>,
    ) -> Result<ScopeSelector, DomainError> {
        let own_company = authz::require_company(ctx)?;
        match scope {
            ListScope::Company => Ok(ScopeSelector::Company),
            ListScope::Department => {
                let id = scope_id.ok_or_else(|| {
                    DomainError::validation_field("scope_id", "scope_id is required")
                })?;
                let department = self
                    .store
                    .fetch_department(DepartmentId(id))?
                    .filter(|department| department.company_id == own_company)
                    .ok_or_else(|| {
                        DomainError::authorization("scope does not belong to your company")
                    })?;
                Ok(ScopeSelector::Department(department.id))
            }
            ListScope::Employee => {
                let id = scope_id.ok_or_else(|| {
                    DomainError::validation_field("scope_id", "scope_id is required")
                })?;
                let employee = self
                    .store
                    .fetch_employee(EmployeeId(id))?
                    .filter(|employee| employee.company_id == own_company)
                    .ok_or_else(|| {
                        DomainError::authorization("scope does not belong to your company")
                    })?;
                Ok(ScopeSelector::Employee(employee.id))
            }
        }
    }

    /// Administrative listing: all policies at exactly one scope.
    pub fn list(
        &self,
        ctx: &AuthContext,
        scope: ListScope,
        scope_id: Option<Uuid>,
    ) -> Result<Vec<Policy>, DomainError> {
        authz::require_admin(ctx)?;
        let own_company = authz::require_company(ctx)?;
        let selector = self.selector_for(ctx, scope, scope_id)?;
        self.resolver.list_policies(own_company, selector)
    }

    /// Precedence walk for the requester themself. Admins may have no
    /// employee record, in which case resolution starts at the company
    /// level.
    pub fn resolve_effective(
        &self,
        ctx: &AuthContext,
    ) -> Result<BTreeMap<PolicyType, Option<Policy>>, DomainError> {
        let own_company = authz::require_company(ctx)?;
        let employee: Option<Employee> = self.store.fetch_employee_by_user(ctx.user_id)?;
        self.resolver
            .resolve_effective_policies(own_company, employee.as_ref())
    }
}
