use crate::auth::domain::UserId;
use crate::error::RepositoryError;

use super::domain::{Company, CompanyId, Department, DepartmentId, Employee, EmployeeId};

/// Storage abstraction for companies (tenant roots). Companies are never
/// hard-deleted.
pub trait CompanyRepository: Send + Sync {
    /// Conflict on duplicate company email.
    fn insert_company(&self, company: Company) -> Result<Company, RepositoryError>;
    fn fetch_company(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError>;
    fn update_company(&self, company: Company) -> Result<(), RepositoryError>;
}

/// Storage abstraction for departments.
pub trait DepartmentRepository: Send + Sync {
    /// Conflict on duplicate `(company, name)`.
    fn insert_department(&self, department: Department) -> Result<Department, RepositoryError>;
    fn fetch_department(&self, id: DepartmentId) -> Result<Option<Department>, RepositoryError>;
    fn list_departments(&self, company_id: CompanyId) -> Result<Vec<Department>, RepositoryError>;
    /// Cascades department-scoped policies and nulls members' department.
    fn delete_department(&self, id: DepartmentId) -> Result<(), RepositoryError>;
}

/// Storage abstraction for employees.
pub trait EmployeeRepository: Send + Sync {
    /// Conflict on duplicate employee code or already-wrapped user.
    fn insert_employee(&self, employee: Employee) -> Result<Employee, RepositoryError>;
    fn fetch_employee(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError>;
    fn fetch_employee_by_code(&self, code: &str) -> Result<Option<Employee>, RepositoryError>;
    fn fetch_employee_by_user(&self, user_id: UserId)
        -> Result<Option<Employee>, RepositoryError>;
    /// Cascades the employee's policies and nulls department heads
    /// referencing them.
    fn delete_employee(&self, id: EmployeeId) -> Result<(), RepositoryError>;
}
