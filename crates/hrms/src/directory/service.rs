use std::sync::Arc;

use chrono::Utc;

use crate::auth::domain::AuthContext;
use crate::error::DomainError;
use crate::policy::authz;
use crate::store::HrStore;

use super::domain::{
    Company, CompanyId, CreateCompany, CreateDepartment, CreateEmployee, Department,
    DepartmentId, Employee, EmployeeId, UpdateCompany,
};

/// Company, department, and employee provisioning.
pub struct DirectoryService<S> {
    store: Arc<S>,
}

impl<S> DirectoryService<S>
where
    S: HrStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create the requester's company. Each account provisions at most one.
    pub fn provision_company(
        &self,
        ctx: &AuthContext,
        input: CreateCompany,
    ) -> Result<Company, DomainError> {
        let mut user = self
            .store
            .fetch_user(ctx.user_id)?
            .ok_or_else(|| DomainError::not_found("user"))?;

        if user.company_id.is_some() {
            return Err(DomainError::validation("company details already filled"));
        }

        for (field, value) in [
            ("name", &input.name),
            ("email", &input.email),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::validation_field(field, "field is required"));
            }
        }
        for (field, value) in [
            ("industry", &input.industry),
            ("size", &input.size),
            ("address", &input.address),
            ("country_code", &input.country_code),
            ("phone", &input.phone),
        ] {
            if value.as_deref().map(str::trim).unwrap_or("").is_empty() {
                return Err(DomainError::validation_field(field, "field is required"));
            }
        }

        let now = Utc::now();
        let company = Company {
            id: CompanyId::generate(),
            name: input.name,
            owner_name: input.owner_name,
            email: input.email,
            industry: input.industry,
            size: input.size,
            address: input.address,
            country_code: input.country_code,
            phone: input.phone,
            logo: input.logo,
            tax_id: input.tax_id,
            website: input.website,
            created_at: now,
            updated_at: now,
        };

        let company = self
            .store
            .insert_company(company)
            .map_err(|_| DomainError::conflict("a company with this email already exists"))?;

        user.company_id = Some(company.id);
        user.updated_at = Utc::now();
        self.store.update_user(user)?;

        Ok(company)
    }

    /// Partial-field patch of the requester's own company.
    pub fn update_company(
        &self,
        ctx: &AuthContext,
        patch: UpdateCompany,
    ) -> Result<Company, DomainError> {
        let company_id = ctx
            .company_id
            .ok_or_else(|| DomainError::not_found("company"))?;
        let mut company = self
            .store
            .fetch_company(company_id)?
            .ok_or_else(|| DomainError::not_found("company"))?;

        if let Some(name) = patch.name {
            company.name = name;
        }
        if let Some(industry) = patch.industry {
            company.industry = Some(industry);
        }
        if let Some(size) = patch.size {
            company.size = Some(size);
        }
        if let Some(address) = patch.address {
            company.address = Some(address);
        }
        if let Some(country_code) = patch.country_code {
            company.country_code = Some(country_code);
        }
        if let Some(phone) = patch.phone {
            company.phone = Some(phone);
        }
        if let Some(logo) = patch.logo {
            company.logo = Some(logo);
        }
        if let Some(tax_id) = patch.tax_id {
            company.tax_id = Some(tax_id);
        }
        if let Some(website) = patch.website {
            company.website = Some(website);
        }
        company.updated_at = Utc::now();

        self.store.update_company(company.clone())?;
        Ok(company)
    }

    /// Create a department within the requester's company. Admin only.
    pub fn create_department(
        &self,
        ctx: &AuthContext,
        input: CreateDepartment,
    ) -> Result<Department, DomainError> {
        authz::require_admin(ctx)?;
        let company_id = authz::require_company(ctx)?;

        if input.name.trim().is_empty() {
            return Err(DomainError::validation_field("name", "field is required"));
        }

        if let Some(head) = input.head {
            let head_employee = self
                .store
                .fetch_employee(head)?
                .ok_or_else(|| DomainError::validation_field("head", "employee does not exist"))?;
            if head_employee.company_id != company_id {
                return Err(DomainError::validation_field(
                    "head",
                    "head must be an employee of the same company",
                ));
            }
        }

        let now = Utc::now();
        let department = Department {
            id: DepartmentId::generate(),
            company_id,
            name: input.name,
            description: input.description,
            head: input.head,
            leave_allotments: input.leave_allotments,
            created_at: now,
            updated_at: now,
        };

        self.store.insert_department(department).map_err(|_| {
            DomainError::conflict("a department with this name already exists in the company")
        })
    }

    /// Departments of the requester's company, ordered by name.
    pub fn list_departments(&self, ctx: &AuthContext) -> Result<Vec<Department>, DomainError> {
        let company_id = authz::require_company(ctx)?;
        Ok(self.store.list_departments(company_id)?)
    }

    /// Remove a department. Admin only; members survive with their
    /// department reference cleared and department-scoped policies cascade.
    pub fn delete_department(
        &self,
        ctx: &AuthContext,
        id: DepartmentId,
    ) -> Result<(), DomainError> {
        authz::require_admin(ctx)?;
        let company_id = authz::require_company(ctx)?;

        let department = self
            .store
            .fetch_department(id)?
            .filter(|department| department.company_id == company_id)
            .ok_or_else(|| {
                DomainError::authorization("scope does not belong to your company")
            })?;

        self.store.delete_department(department.id)?;
        Ok(())
    }

    /// Create an employee record wrapping an existing user. Admin only.
    pub fn create_employee(
        &self,
        ctx: &AuthContext,
        input: CreateEmployee,
    ) -> Result<Employee, DomainError> {
        authz::require_admin(ctx)?;
        let company_id = authz::require_company(ctx)?;

        for (field, value) in [
            ("employee_code", &input.employee_code),
            ("first_name", &input.first_name),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::validation_field(field, "field is required"));
            }
        }

        let user = self
            .store
            .fetch_user(input.user_id)?
            .ok_or_else(|| DomainError::validation_field("user_id", "user does not exist"))?;
        if self.store.fetch_employee_by_user(user.id)?.is_some() {
            return Err(DomainError::conflict(
                "this user already has an employee record",
            ));
        }

        if let Some(department_id) = input.department_id {
            let department = self.store.fetch_department(department_id)?.ok_or_else(|| {
                DomainError::validation_field("department_id", "department does not exist")
            })?;
            if department.company_id != company_id {
                return Err(DomainError::validation_field(
                    "department_id",
                    "department must belong to the same company",
                ));
            }
        }

        let now = Utc::now();
        let employee = Employee {
            id: EmployeeId::generate(),
            employee_code: input.employee_code,
            user_id: input.user_id,
            company_id,
            department_id: input.department_id,
            first_name: input.first_name,
            category: input.category,
            joining_date: input.joining_date,
            contact: input.contact,
            bank_details: input.bank_details,
            emergency_contact: input.emergency_contact,
            date_of_birth: input.date_of_birth,
            documents: input.documents,
            created_at: now,
            updated_at: now,
        };

        self.store
            .insert_employee(employee)
            .map_err(|_| DomainError::conflict("employee code is already in use"))
    }

    /// Remove an employee from the requester's company. Admin only; a code
    /// from another tenant fails closed.
    pub fn delete_employee(
        &self,
        ctx: &AuthContext,
        employee_code: &str,
    ) -> Result<(), DomainError> {
        authz::require_admin(ctx)?;
        let company_id = authz::require_company(ctx)?;

        let employee = self
            .store
            .fetch_employee_by_code(employee_code)?
            .filter(|employee| employee.company_id == company_id)
            .ok_or_else(|| {
                DomainError::authorization("you can only delete employees of your own company")
            })?;

        self.store.delete_employee(employee.id)?;
        Ok(())
    }
}
