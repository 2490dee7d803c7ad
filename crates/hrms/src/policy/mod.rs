//! HR policy storage, resolution, and mutation.
//!
//! Policies attach to exactly one scope level (company, department, or
//! employee) and resolution walks the levels from most to least specific,
//! returning the first match. Mutations are admin-only and tenant-fenced.

pub mod authz;
pub mod domain;
pub mod mutator;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Policy, PolicyDraft, PolicyId, PolicyScopeKey, PolicyType, ScopeBinding,
};
pub use mutator::PolicyMutator;
pub use repository::{BatchConflict, PolicyRepository, ScopeSelector};
pub use resolver::PolicyResolver;
pub use router::{policy_router, PolicyRouterState};
pub use service::{ListScope, PolicyService};
