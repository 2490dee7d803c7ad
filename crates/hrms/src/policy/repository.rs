use crate::directory::domain::{CompanyId, DepartmentId, EmployeeId};
use crate::error::RepositoryError;

use super::domain::{Policy, PolicyScopeKey, PolicyType};

/// Query selector for a single specificity level. The precedence walk is
/// an ordered sequence of these, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeSelector {
    /// Policies bound to this employee, whatever department they pin.
    Employee(EmployeeId),
    /// Department-wide policies (employee unset).
    Department(DepartmentId),
    /// Company-wide defaults (department and employee unset).
    Company,
}

impl ScopeSelector {
    pub(crate) fn matches(&self, policy: &Policy) -> bool {
        match self {
            ScopeSelector::Employee(id) => policy.employee_id == Some(*id),
            ScopeSelector::Department(id) => {
                policy.employee_id.is_none() && policy.department_id == Some(*id)
            }
            ScopeSelector::Company => {
                policy.employee_id.is_none() && policy.department_id.is_none()
            }
        }
    }
}

/// Conflict raised by an all-or-nothing batch insert, naming the item that
/// collided so callers can report it.
#[derive(Debug, thiserror::Error)]
#[error("batch item {index} conflicts with an existing policy")]
pub struct BatchConflict {
    pub index: usize,
}

/// Storage abstraction for policies. Implementations must enforce the
/// scope-key unique index inside their own atomic section so a race that
/// slips past the mutator pre-check still surfaces as a conflict.
pub trait PolicyRepository: Send + Sync {
    fn insert_policy(&self, policy: Policy) -> Result<Policy, RepositoryError>;

    /// Insert every policy or none. Uniqueness is checked across the batch
    /// and against existing rows before the first write.
    fn insert_policies(&self, policies: Vec<Policy>) -> Result<Vec<Policy>, BatchConflict>;

    /// Replace an existing row, located by id.
    fn update_policy(&self, policy: Policy) -> Result<(), RepositoryError>;

    /// Exact unique-tuple lookup.
    fn find_policy_by_key(
        &self,
        key: &PolicyScopeKey,
    ) -> Result<Option<Policy>, RepositoryError>;

    /// Single-type lookup at one specificity level.
    fn find_policy_scoped(
        &self,
        company_id: CompanyId,
        policy_type: PolicyType,
        selector: ScopeSelector,
    ) -> Result<Option<Policy>, RepositoryError>;

    /// Every policy at exactly one specificity level, all types, ordered by
    /// type declaration order then creation time.
    fn list_policies_scoped(
        &self,
        company_id: CompanyId,
        selector: ScopeSelector,
    ) -> Result<Vec<Policy>, RepositoryError>;
}
