use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::domain::UserId;

/// Identifier wrapper for companies (tenant roots).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub Uuid);

impl CompanyId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Identifier wrapper for departments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentId(pub Uuid);

impl DepartmentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Identifier wrapper for employees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub Uuid);

impl EmployeeId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A company is the tenant root: every department, employee, and policy
/// belongs to exactly one company, and cross-company access always fails
/// the authorization gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub owner_name: Option<String>,
    /// Unique across tenants.
    pub email: String,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub address: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub logo: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to provision a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub email: String,
    pub owner_name: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub address: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub logo: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
}

/// Partial-field patch for an existing company.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub address: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub logo: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
}

/// A department groups employees within one company.
///
/// `(company_id, name)` is unique. `head` weakly references an employee of
/// the same company and is nulled when that employee is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub company_id: CompanyId,
    pub name: String,
    pub description: String,
    pub head: Option<EmployeeId>,
    /// Leave-type keys mapped to yearly allotments. Kept separate from
    /// leave policies; the two are not reconciled.
    pub leave_allotments: BTreeMap<String, u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDepartment {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub head: Option<EmployeeId>,
    #[serde(default)]
    pub leave_allotments: BTreeMap<String, u32>,
}

/// Whether an employee works in the field/onsite or in-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeCategory {
    Field,
    InOffice,
}

impl EmployeeCategory {
    pub const fn label(self) -> &'static str {
        match self {
            EmployeeCategory::Field => "field",
            EmployeeCategory::InOffice => "in_office",
        }
    }
}

/// An employee wraps exactly one user record and belongs to one company,
/// optionally one department of that company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    /// Human-facing unique code, e.g. `EMP-00042`.
    pub employee_code: String,
    pub user_id: UserId,
    pub company_id: CompanyId,
    pub department_id: Option<DepartmentId>,
    pub first_name: String,
    pub category: EmployeeCategory,
    pub joining_date: NaiveDate,
    pub contact: Option<String>,
    pub bank_details: Option<serde_json::Value>,
    pub emergency_contact: Option<serde_json::Value>,
    pub date_of_birth: Option<NaiveDate>,
    pub documents: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployee {
    pub employee_code: String,
    pub user_id: UserId,
    pub first_name: String,
    pub category: EmployeeCategory,
    pub joining_date: NaiveDate,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub bank_details: Option<serde_json::Value>,
    #[serde(default)]
    pub emergency_contact: Option<serde_json::Value>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub documents: Option<serde_json::Value>,
}
