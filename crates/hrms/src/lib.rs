//! Multi-tenant HR management core.
//!
//! The crate is organized around three workflows: [`directory`] owns the
//! company/department/employee graph, [`policy`] owns scoped HR policies and
//! the precedence walk that resolves them, and [`auth`] owns login and the
//! password lifecycle. [`store`] provides the shared in-memory backend and
//! [`error`] the domain error taxonomy every workflow maps onto.

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod http;
pub mod policy;
pub mod store;
pub mod telemetry;

pub use error::{AppError, DomainError, RepositoryError};
pub use store::{HrStore, InMemoryHrStore};
