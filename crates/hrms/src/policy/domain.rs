use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::directory::domain::{CompanyId, DepartmentId, EmployeeId};

/// Identifier wrapper for policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(pub Uuid);

impl PolicyId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Closed enumeration of policy types. Unknown types are rejected at
/// deserialization, before any mutator or resolver sees them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    Leave,
    Attendance,
    Overtime,
    Late,
    WorkingHours,
}

impl PolicyType {
    /// Walk order for full-map resolution and listing.
    pub const ALL: [PolicyType; 5] = [
        PolicyType::Leave,
        PolicyType::Attendance,
        PolicyType::Overtime,
        PolicyType::Late,
        PolicyType::WorkingHours,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PolicyType::Leave => "leave",
            PolicyType::Attendance => "attendance",
            PolicyType::Overtime => "overtime",
            PolicyType::Late => "late",
            PolicyType::WorkingHours => "working_hours",
        }
    }
}

/// A policy document applying at company, department, or employee scope.
///
/// At most one policy exists per `(company, type, employee, department)`
/// tuple; the store's unique index on that key is the authoritative guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub company_id: CompanyId,
    pub department_id: Option<DepartmentId>,
    pub employee_id: Option<EmployeeId>,
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    pub title: String,
    /// Structured key-value blob whose shape depends on `policy_type`.
    pub details: serde_json::Value,
    pub effective_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Policy {
    pub fn scope_key(&self) -> PolicyScopeKey {
        PolicyScopeKey {
            company_id: self.company_id,
            policy_type: self.policy_type,
            employee_id: self.employee_id,
            department_id: self.department_id,
        }
    }
}

/// The unique-index key: one policy per type at each specificity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolicyScopeKey {
    pub company_id: CompanyId,
    pub policy_type: PolicyType,
    pub employee_id: Option<EmployeeId>,
    pub department_id: Option<DepartmentId>,
}

/// Inbound create/update payload before scope normalization.
///
/// The company/department fields are advisory when an employee is given:
/// the most specific scope wins and overrides them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDraft {
    #[serde(default)]
    pub company: Option<CompanyId>,
    #[serde(default)]
    pub department: Option<DepartmentId>,
    #[serde(default)]
    pub employee: Option<EmployeeId>,
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    pub title: String,
    #[serde(default)]
    pub details: serde_json::Value,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
}

/// A fully normalized scope: company always set, employee scope pinning the
/// department it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeBinding {
    pub company_id: CompanyId,
    pub department_id: Option<DepartmentId>,
    pub employee_id: Option<EmployeeId>,
}

impl ScopeBinding {
    pub fn key(&self, policy_type: PolicyType) -> PolicyScopeKey {
        PolicyScopeKey {
            company_id: self.company_id,
            policy_type,
            employee_id: self.employee_id,
            department_id: self.department_id,
        }
    }
}
