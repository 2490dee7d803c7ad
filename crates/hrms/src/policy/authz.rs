//! Tenant and role checks guarding policy and department mutation.
//!
//! Cross-company access fails closed with an authorization error, never a
//! not-found, so the existence of out-of-tenant resources is never leaked.

use crate::auth::domain::AuthContext;
use crate::directory::domain::CompanyId;
use crate::error::DomainError;

/// Only company administrators may create or update policies, departments,
/// or employees.
pub fn require_admin(ctx: &AuthContext) -> Result<(), DomainError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(DomainError::authorization(
            "only company admins may perform this action",
        ))
    }
}

/// The requester must act within their own company.
pub fn require_same_company(
    ctx: &AuthContext,
    company_id: CompanyId,
) -> Result<CompanyId, DomainError> {
    match ctx.company_id {
        Some(own) if own == company_id => Ok(own),
        _ => Err(DomainError::authorization(
            "scope does not belong to your company",
        )),
    }
}

/// The requester must belong to a company at all.
pub fn require_company(ctx: &AuthContext) -> Result<CompanyId, DomainError> {
    ctx.company_id
        .ok_or_else(|| DomainError::authorization("no company associated with this account"))
}
