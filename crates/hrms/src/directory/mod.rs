//! Tenant directory: companies, departments, and employee records.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Company, CompanyId, CreateCompany, CreateDepartment, CreateEmployee, Department, DepartmentId,
    Employee, EmployeeCategory, EmployeeId, UpdateCompany,
};
pub use repository::{CompanyRepository, DepartmentRepository, EmployeeRepository};
pub use router::{directory_router, DirectoryRouterState};
pub use service::DirectoryService;
